//! # rolebot-engine
//!
//! Reaction-role engine: the creation flow, the reaction and message-delete
//! handlers, the startup reconciler, and per-message serialization locks.
//! Talks to the store and the platform only through the core ports.

pub mod locks;
pub mod services;

pub use locks::{MessageLockGuard, MessageLocks};
pub use services::*;
