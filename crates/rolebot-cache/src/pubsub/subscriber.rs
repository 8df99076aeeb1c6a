//! Event bus subscriber
//!
//! Holds one Redis pub/sub connection subscribed to the configured event
//! topics and fans every delivery out to in-process receivers. The topic set
//! is fixed at build time; a dropped connection is re-established and the
//! topics re-subscribed after `reconnect_delay_ms`.

use crate::pubsub::{EventEnvelope, Topic};
use futures_util::StreamExt;
use redis::Client;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("No event topics configured")]
    NoTopics,

    #[error("Subscriber already stopped")]
    Stopped,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// One delivery from the bus
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Channel the message was published on
    pub channel: String,
    /// Pattern that matched, for PSUBSCRIBE deliveries
    pub pattern: Option<String>,
    /// `None` when the payload isn't an event envelope
    pub envelope: Option<EventEnvelope>,
    pub payload: String,
}

impl ReceivedMessage {
    pub fn new(channel: impl Into<String>, pattern: Option<String>, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            channel: channel.into(),
            pattern,
            envelope: serde_json::from_str(&payload).ok(),
            payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    pub topics: Vec<Topic>,
    /// Deliveries a slow receiver may fall behind before it lags
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            topics: Vec::new(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Running subscriber; the listener task lives until [`Subscriber::shutdown`]
pub struct Subscriber {
    topics: Vec<Topic>,
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    shutdown_tx: watch::Sender<bool>,
}

impl Subscriber {
    /// Validate the config and spawn the listener
    ///
    /// Connecting happens in the background; only a malformed URL or an
    /// empty topic set fails here.
    pub fn start(config: SubscriberConfig) -> SubscriberResult<Self> {
        if config.topics.is_empty() {
            return Err(SubscriberError::NoTopics);
        }
        let client = Client::open(config.redis_url.as_str())?;

        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(listen(
            client,
            config.topics.clone(),
            Duration::from_millis(config.reconnect_delay_ms),
            broadcast_tx.clone(),
            shutdown_rx,
        ));

        Ok(Self {
            topics: config.topics,
            broadcast_tx,
            shutdown_tx,
        })
    }

    /// New receiver; sees only deliveries made after this call
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.broadcast_tx.subscribe()
    }

    /// Stop the listener and drop the connection
    pub fn shutdown(&self) -> SubscriberResult<()> {
        self.shutdown_tx
            .send(true)
            .map_err(|_| SubscriberError::Stopped)
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("topics", &self.topics)
            .field("receivers", &self.broadcast_tx.receiver_count())
            .finish()
    }
}

/// Reconnect loop around [`pump`]
async fn listen(
    client: Client,
    topics: Vec<Topic>,
    reconnect_delay: Duration,
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            result = pump(&client, &topics, &broadcast_tx) => match result {
                Ok(()) => warn!("Event stream ended, reconnecting"),
                Err(e) => error!(error = %e, "Event bus connection failed, reconnecting"),
            },
        }

        tokio::select! {
            _ = shutdown_rx.changed() => break,
            () = tokio::time::sleep(reconnect_delay) => {}
        }
    }
    info!("Event subscriber stopped");
}

/// Subscribe on a fresh connection and forward deliveries until the stream ends
async fn pump(
    client: &Client,
    topics: &[Topic],
    broadcast_tx: &broadcast::Sender<ReceivedMessage>,
) -> SubscriberResult<()> {
    let mut pubsub = client.get_async_pubsub().await?;
    for topic in topics {
        match topic {
            Topic::Channel(name) => pubsub.subscribe(name).await?,
            Topic::Pattern(pattern) => pubsub.psubscribe(pattern).await?,
        }
        debug!(topic = %topic.name(), "Subscribed");
    }
    info!(topics = topics.len(), "Listening for platform events");

    let mut stream = pubsub.on_message();
    while let Some(msg) = stream.next().await {
        let channel = msg.get_channel_name().to_string();
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                debug!(channel = %channel, error = %e, "Dropping non-text payload");
                continue;
            }
        };
        let pattern = if msg.from_pattern() {
            msg.get_pattern::<String>().ok()
        } else {
            None
        };

        trace!(channel = %channel, "Received event");
        if broadcast_tx
            .send(ReceivedMessage::new(channel, pattern, payload))
            .is_err()
        {
            trace!("No event receivers, message dropped");
        }
    }
    Ok(())
}

/// Builder for [`Subscriber`]
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    /// Add an event topic; duplicates are ignored
    #[must_use]
    pub fn subscribe(mut self, topic: Topic) -> Self {
        if !self.config.topics.contains(&topic) {
            self.config.topics.push(topic);
        }
        self
    }

    pub fn start(self) -> SubscriberResult<Subscriber> {
        Subscriber::start(self.config)
    }
}
