use moka::sync::Cache;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tracing::debug;

/// `(page, page_size)` with a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub page: u32,
    pub page_size: u32,
}

impl PageKey {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Process-local read-through cache with a fixed time-to-live and no size bound.
///
/// Entries are only checked for staleness on read; nothing survives a restart.
#[derive(Clone)]
pub struct PageCache<V, K = PageKey>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<K, V>,
}

impl<V, K> PageCache<V, K>
where
    K: Hash + Eq + Copy + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();
        Self { cache }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key)
    }

    /// Return the cached value for `key`, or run `load` and cache its success.
    ///
    /// Concurrent misses for the same key may each call `load`; the last one wins.
    pub async fn get_or_try_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.cache.get(&key) {
            debug!(?key, "Page cache hit");
            return Ok(hit);
        }

        let value = load().await?;
        self.cache.insert(key, value.clone());
        debug!(?key, "Page cache filled");
        Ok(value)
    }
}
