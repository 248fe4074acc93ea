//! Process-wide shadow cache for asset descriptors.
//!
//! Time-bounded and never authoritative: the durable aggregate remains the
//! source of truth for listings, the cache only accelerates ownership checks
//! and logo metadata reads. Values are cloned on insert and on read, so no
//! caller ever observes another caller's mutations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mediaslot_core::models::AssetDescriptor;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry {
    descriptor: AssetDescriptor,
    expires_at: Instant,
}

/// TTL key/value store for recently written or read asset records.
///
/// Entries carry an absolute expiry measured from insertion; a periodic sweep
/// purges expired entries, and a read of an expired-but-not-yet-swept entry
/// reports absent. There is no eviction beyond TTL expiry.
///
/// Constructed once at startup and injected into request handlers; the
/// sweeper task is owned by the caller and aborted at shutdown.
#[derive(Clone)]
pub struct AssetCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl AssetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Insert or replace the entry for `key`. The descriptor is stored by
    /// value; later mutations by the caller are not reflected here.
    pub async fn set(&self, key: &str, descriptor: AssetDescriptor) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                descriptor,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Fetch a clone of the entry for `key`, treating expired entries as
    /// absent even before the sweeper has removed them.
    pub async fn get(&self, key: &str) -> Option<AssetDescriptor> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.descriptor.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn del(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }

    /// Purge expired entries. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Spawn the periodic sweeper. The returned handle should be aborted on
    /// shutdown.
    pub fn spawn_sweeper(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the sweep
            // cadence starts one interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = cache.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired cache entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn descriptor(entity_id: &str, position: u32) -> AssetDescriptor {
        AssetDescriptor {
            id: Uuid::new_v4(),
            entity_id: entity_id.to_string(),
            entity_type: "product".to_string(),
            company_id: "C1".to_string(),
            stored_name: format!("{}-{}.png", entity_id, position),
            original_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 64,
            position: Some(position),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_set_get_del() {
        let cache = AssetCache::new(Duration::from_secs(7200));

        cache.set("E1:0", descriptor("E1", 0)).await;
        let cached = cache.get("E1:0").await.expect("entry present");
        assert_eq!(cached.stored_name, "E1-0.png");

        cache.del("E1:0").await;
        assert!(cache.get("E1:0").await.is_none());
    }

    #[tokio::test]
    async fn test_get_returns_a_copy() {
        let cache = AssetCache::new(Duration::from_secs(7200));
        cache.set("E1:0", descriptor("E1", 0)).await;

        let mut first = cache.get("E1:0").await.unwrap();
        first.company_id = "C2".to_string();

        // The mutation above must not be visible to other readers.
        let second = cache.get("E1:0").await.unwrap();
        assert_eq!(second.company_id, "C1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_reads_absent_before_sweep() {
        let cache = AssetCache::new(Duration::from_secs(7200));
        cache.set("E1:0", descriptor("E1", 0)).await;

        tokio::time::advance(Duration::from_secs(7199)).await;
        assert!(cache.get("E1:0").await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("E1:0").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_purges_only_expired_entries() {
        let cache = AssetCache::new(Duration::from_secs(7200));
        cache.set("old", descriptor("E1", 0)).await;

        tokio::time::advance(Duration::from_secs(3600)).await;
        cache.set("young", descriptor("E1", 1)).await;

        tokio::time::advance(Duration::from_secs(3601)).await;
        let removed = cache.sweep().await;

        assert_eq!(removed, 1);
        assert!(cache.get("young").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_runs_periodically() {
        let cache = AssetCache::new(Duration::from_secs(10));
        cache.set("E1:0", descriptor("E1", 0)).await;

        let handle = cache.spawn_sweeper(Duration::from_secs(600));
        // Let the spawned task run far enough to create its interval (anchored
        // at the current paused time) before we advance the clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(601)).await;
        // Let the sweeper task observe the tick.
        tokio::task::yield_now().await;

        let entries = cache.entries.lock().await;
        assert!(entries.is_empty());
        drop(entries);

        handle.abort();
    }
}
