//! Compensating actions for best-effort multi-step operations
//!
//! Each step that leaves state behind records how to undo itself. On failure
//! the recorded compensations run newest first; a failing compensation is
//! logged and the rest still run.

use rolebot_core::Snowflake;
use tracing::{debug, warn};

use super::context::EngineContext;

/// Undo action for one completed step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    DeletePlatformMessage {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
}

/// What a compensation run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompensationReport {
    pub attempted: usize,
    pub failed: usize,
}

pub struct Saga<'a> {
    ctx: &'a EngineContext,
    name: &'static str,
    steps: Vec<Compensation>,
}

impl<'a> Saga<'a> {
    pub fn new(ctx: &'a EngineContext, name: &'static str) -> Self {
        Self {
            ctx,
            name,
            steps: Vec::new(),
        }
    }

    /// Record the compensation for a step that just succeeded
    pub fn record(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    /// All steps succeeded; forget the compensations
    pub fn complete(self) {
        debug!(saga = self.name, steps = self.steps.len(), "Saga completed");
    }

    /// Undo every recorded step, newest first
    pub async fn compensate(self) -> CompensationReport {
        let mut report = CompensationReport::default();

        for step in self.steps.iter().rev() {
            report.attempted += 1;
            let result = match *step {
                Compensation::DeletePlatformMessage {
                    channel_id,
                    message_id,
                } => self
                    .ctx
                    .platform()
                    .delete_message(channel_id, message_id)
                    .await
                    .map_err(|e| e.to_string()),
            };

            if let Err(error) = result {
                report.failed += 1;
                warn!(saga = self.name, ?step, %error, "Compensation step failed");
            }
        }

        debug!(
            saga = self.name,
            attempted = report.attempted,
            failed = report.failed,
            "Saga compensated"
        );
        report
    }
}
