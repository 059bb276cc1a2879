//! Short-interval cache over the flattened response set.
//!
//! Bounds full-collection reads from the analytics endpoints; callers accept
//! staleness inside the TTL window. This is the only shared mutable state in
//! the process besides the connection pool.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::analytics::flatten::FlatResponse;

struct CachedRows {
    fetched_at: Instant,
    rows: Arc<Vec<FlatResponse>>,
}

pub struct ResponseCache {
    ttl: Duration,
    slot: RwLock<Option<CachedRows>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached rows if they are still within the TTL window.
    pub async fn get(&self) -> Option<Arc<Vec<FlatResponse>>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.rows))
    }

    /// Stores freshly loaded rows and returns a shared handle to them.
    pub async fn put(&self, rows: Vec<FlatResponse>) -> Arc<Vec<FlatResponse>> {
        let rows = Arc::new(rows);
        let mut slot = self.slot.write().await;
        *slot = Some(CachedRows {
            fetched_at: Instant::now(),
            rows: Arc::clone(&rows),
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        assert!(cache.get().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_then_expiry() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.put(Vec::new()).await;

        time::advance(Duration::from_secs(299)).await;
        assert!(cache.get().await.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_the_window() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(Vec::new()).await;

        time::advance(Duration::from_secs(59)).await;
        cache.put(Vec::new()).await;

        time::advance(Duration::from_secs(59)).await;
        assert!(cache.get().await.is_some());
    }
}
