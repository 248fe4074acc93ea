//! Keyed async locks.
//!
//! The aggregate read-merge-write sequence and the logo replacement protocol
//! each need a serialization point per key (entity or tenant). `KeyedLocks`
//! hands out one async mutex per key, creating them on demand and purging
//! entries nobody holds.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-key async mutexes.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another task holds it. The
    /// returned guard keeps the key's mutex alive until dropped.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            // Drop mutexes nobody holds; the map reference is the only one left.
            map.retain(|_, l| Arc::strong_count(l) > 1);
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
