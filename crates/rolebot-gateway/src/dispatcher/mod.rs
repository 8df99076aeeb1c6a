//! Event dispatcher
//!
//! Receives envelopes from the bus subscriber, decodes them, and runs each
//! event in its own task. A failed or panicked task is logged; the loop
//! keeps going.

use std::future::Future;
use std::sync::Arc;

use rolebot_cache::ReceivedMessage;
use rolebot_core::PlatformEvent;
use rolebot_engine::{
    EngineContext, MessageDeleteOutcome, MessageDeleteService, MessageLocks, ReactionOutcome,
    ReactionService,
};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};

use crate::commands::{CommandHandler, IntakeOutcome};
use crate::events::decode_event;

/// What handling one event produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    Reaction(ReactionOutcome),
    MessageDelete(MessageDeleteOutcome),
    Command(IntakeOutcome),
}

#[derive(Clone)]
pub struct EventDispatcher {
    engine: EngineContext,
    commands: Option<Arc<CommandHandler>>,
    /// Serializes events per platform message when set
    locks: Option<MessageLocks>,
}

impl EventDispatcher {
    pub fn new(engine: EngineContext) -> Self {
        Self {
            engine,
            commands: None,
            locks: None,
        }
    }

    pub fn with_commands(mut self, commands: Arc<CommandHandler>) -> Self {
        self.commands = Some(commands);
        self
    }

    pub fn with_message_locks(mut self, locks: MessageLocks) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn engine(&self) -> &EngineContext {
        &self.engine
    }

    /// Handle one decoded event to completion
    pub async fn handle_event(&self, event: PlatformEvent) -> EventOutcome {
        // Command intake doesn't touch tracked state
        let _guard = match (&self.locks, &event) {
            (_, PlatformEvent::MessageCreate(_)) | (None, _) => None,
            (Some(locks), event) => match event.message_id() {
                Some(message_id) => Some(locks.lock(message_id).await),
                None => None,
            },
        };

        match event {
            PlatformEvent::Ready => {
                debug!("Platform connection ready");
                EventOutcome::Ignored
            }
            PlatformEvent::ReactionAdd(reaction) | PlatformEvent::ReactionRemove(reaction) => {
                EventOutcome::Reaction(ReactionService::new(&self.engine).handle(&reaction).await)
            }
            PlatformEvent::MessageDelete(deleted) => EventOutcome::MessageDelete(
                MessageDeleteService::new(&self.engine).handle(&deleted).await,
            ),
            PlatformEvent::MessageCreate(message) => match &self.commands {
                Some(commands) => EventOutcome::Command(commands.handle(&self.engine, &message).await),
                None => EventOutcome::Ignored,
            },
        }
    }

    /// Decode a bus message, `None` when there's nothing to handle
    fn decode(message: &ReceivedMessage) -> Option<PlatformEvent> {
        let Some(envelope) = &message.envelope else {
            debug!(channel = %message.channel, "Received non-event message, ignoring");
            return None;
        };

        match decode_event(envelope) {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                trace!(event_type = %envelope.event_type, "Ignoring event type");
                None
            }
            Err(e) => {
                warn!(channel = %message.channel, error = %e, "Failed to decode event");
                None
            }
        }
    }

    /// Drain `receiver` until it closes or `shutdown` resolves
    ///
    /// In-flight tasks are awaited before returning.
    pub async fn run<S>(&self, mut receiver: broadcast::Receiver<ReceivedMessage>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);
        info!("Event dispatcher started");

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Event dispatcher shutting down");
                    break;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_task_result(joined);
                }
                received = receiver.recv() => match received {
                    Ok(message) => {
                        if let Some(event) = Self::decode(&message) {
                            let dispatcher = self.clone();
                            tasks.spawn(async move {
                                let event_type = event.event_type();
                                let outcome = dispatcher.handle_event(event).await;
                                debug!(event_type, ?outcome, "Event handled");
                                outcome
                            });
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(lagged = n, "Event dispatcher lagged behind, events lost");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("Event channel closed");
                        break;
                    }
                },
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_task_result(joined);
        }
        info!("Event dispatcher loop ended");
    }
}

fn log_task_result(joined: Result<EventOutcome, tokio::task::JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "Event task panicked");
        } else {
            warn!(error = %e, "Event task cancelled");
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("commands", &self.commands.is_some())
            .field("serialize_per_message", &self.locks.is_some())
            .finish()
    }
}
