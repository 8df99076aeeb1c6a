//! Per-message serialization locks
//!
//! Events touching the same platform message can be run one at a time by
//! holding that message's lock. Entries are dropped once nobody holds or
//! waits on them.

use std::sync::Arc;

use dashmap::DashMap;
use rolebot_core::Snowflake;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct MessageLocks {
    locks: Arc<DashMap<Snowflake, Arc<Mutex<()>>>>,
}

impl MessageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `message_id`
    pub async fn lock(&self, message_id: Snowflake) -> MessageLockGuard {
        let mutex = self
            .locks
            .entry(message_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;

        MessageLockGuard {
            guard: Some(guard),
            message_id,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of messages with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Clone for MessageLocks {
    fn clone(&self) -> Self {
        Self {
            locks: Arc::clone(&self.locks),
        }
    }
}

/// Held lock; releases and prunes the entry on drop
pub struct MessageLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    message_id: Snowflake,
    locks: Arc<DashMap<Snowflake, Arc<Mutex<()>>>>,
}

impl MessageLockGuard {
    pub fn message_id(&self) -> Snowflake {
        self.message_id
    }
}

impl Drop for MessageLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own reference left: no holder, no waiter
        self.locks
            .remove_if(&self.message_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
