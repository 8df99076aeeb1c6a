//! Engine services

mod context;
mod creation;
mod error;
mod message_delete;
mod reaction;
mod reconcile;
mod saga;

pub use context::{EngineContext, EngineContextBuilder};
pub use creation::{
    build_message_text, CreateTrackedMessage, CreatedTrackedMessage, CreationService,
    ReactionRolePair,
};
pub use error::{EngineError, EngineResult};
pub use message_delete::{MessageDeleteOutcome, MessageDeleteService};
pub use reaction::{ReactionOutcome, ReactionService};
pub use reconcile::{ReconcileReport, Reconciler};
pub use saga::{Compensation, CompensationReport, Saga};
