//! # rolebot-gateway
//!
//! The bot process: event intake from the bus, per-event dispatch into the
//! engine, the REST platform client, and operator commands.

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod platform;
pub mod server;

pub use dispatcher::{EventDispatcher, EventOutcome};
pub use server::run;
