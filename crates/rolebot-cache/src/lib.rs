//! # rolebot-cache
//!
//! Redis layer. Inbound platform events arrive over Redis pub/sub; the
//! [`Subscriber`] listens on the event topics and fans deliveries out to
//! in-process receivers.
//!
//! ## Example
//!
//! ```ignore
//! use rolebot_cache::{SubscriberBuilder, Topic};
//!
//! let subscriber = SubscriberBuilder::new()
//!     .redis_url("redis://127.0.0.1:6379")
//!     .subscribe(Topic::pattern("channel:*"))
//!     .start()?;
//!
//! let mut rx = subscriber.receiver();
//! while let Ok(msg) = rx.recv().await {
//!     // ...
//! }
//! ```

pub mod pubsub;

// Re-export pubsub types
pub use pubsub::{
    EventEnvelope, ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult, Topic,
};
