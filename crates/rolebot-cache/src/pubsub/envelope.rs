//! Event envelope published on the bus
//!
//! ```json
//! {"event_type": "MESSAGE_REACTION_ADD", "data": {...}}
//! ```
//! Extra fields (such as a routing target) are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EventEnvelope {
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }
}

/// Pub/sub subscription target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Exact channel name (SUBSCRIBE)
    Channel(String),
    /// Glob pattern (PSUBSCRIBE)
    Pattern(String),
}

impl Topic {
    pub fn channel(name: impl Into<String>) -> Self {
        Self::Channel(name.into())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    /// Pattern topics for anything containing a glob character
    pub fn parse(spec: &str) -> Self {
        if spec.contains(['*', '?', '[']) {
            Self::Pattern(spec.to_string())
        } else {
            Self::Channel(spec.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Channel(name) | Self::Pattern(name) => name,
        }
    }
}
