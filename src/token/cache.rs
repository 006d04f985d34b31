//! Token properties cache
//!
//! The resolver reads through `batch_get` and writes through `set`.
//! - Key: `token-properties-{chain_id}-{address}`
//! - The in-memory implementation is an LRU with a TTL (1 hour by default)

use crate::error::AppResult;
use crate::models::TokenPropertiesResult;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Cache key for a token's properties
pub fn token_properties_cache_key(chain_id: u64, address: &str) -> String {
    format!("token-properties-{}-{}", chain_id, address)
}

/// Backend storing resolved token properties
///
/// Concurrent writers to the same key are allowed; the last write wins.
#[async_trait::async_trait]
pub trait TokenPropertiesCache: Send + Sync {
    /// Fetch cached properties for lower-cased addresses; misses are simply absent
    async fn batch_get(
        &self,
        addresses: &HashSet<String>,
    ) -> AppResult<HashMap<String, TokenPropertiesResult>>;

    /// Store properties under a full cache key
    async fn set(&self, key: &str, value: TokenPropertiesResult) -> AppResult<bool>;
}

struct CacheEntry {
    result: TokenPropertiesResult,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now() - self.cached_at < ttl
    }
}

/// In-memory LRU cache for token properties on one chain
pub struct LruTokenPropertiesCache {
    chain_id: u64,
    /// Keyed by full cache key
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl LruTokenPropertiesCache {
    /// Create a cache holding up to `capacity` tokens for `ttl_seconds` each
    ///
    /// A zero capacity falls back to 1000.
    pub fn new(chain_id: u64, capacity: usize, ttl_seconds: i64) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN.saturating_add(999));
        Self {
            chain_id,
            cache: Mutex::new(LruCache::new(cap)),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// 1000 tokens, one hour TTL
    pub fn default_config(chain_id: u64) -> Self {
        Self::new(chain_id, 1000, 3600)
    }

    /// Properties stored under a full cache key; expired entries are evicted on read
    pub fn get(&self, key: &str) -> Option<TokenPropertiesResult> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => return Some(entry.result.clone()),
            Some(_) => {}
            None => return None,
        }

        cache.pop(key);
        tracing::trace!(chain_id = self.chain_id, key = key, "Evicted expired token properties");
        None
    }

    pub fn insert(&self, key: String, result: TokenPropertiesResult) {
        self.cache.lock().put(
            key,
            CacheEntry {
                result,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Occupancy snapshot, logged by the binary after each run
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.lock();
        CacheStats {
            entries: cache.len(),
            capacity: cache.cap().get(),
        }
    }
}

#[async_trait::async_trait]
impl TokenPropertiesCache for LruTokenPropertiesCache {
    async fn batch_get(
        &self,
        addresses: &HashSet<String>,
    ) -> AppResult<HashMap<String, TokenPropertiesResult>> {
        let found = addresses
            .iter()
            .filter_map(|address| {
                self.get(&token_properties_cache_key(self.chain_id, address))
                    .map(|result| (address.clone(), result))
            })
            .collect();

        Ok(found)
    }

    async fn set(&self, key: &str, value: TokenPropertiesResult) -> AppResult<bool> {
        self.insert(key.to_string(), value);
        Ok(true)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// Maximum capacity
    pub capacity: usize,
}
