//! Redis Pub/Sub module.
//!
//! Receives platform events published on the bus.

mod envelope;
mod subscriber;

pub use envelope::{EventEnvelope, Topic};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
