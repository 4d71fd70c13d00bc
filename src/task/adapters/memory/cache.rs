//! In-memory cache with clock-driven expiry.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::ports::{CacheConfig, CacheError, CacheKey, CacheResult, ListingCache};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory cache keyed by namespaced strings.
///
/// Entries expire after the configured freshness window against the
/// injected clock, so tests can advance time without sleeping. Expired
/// entries read as absent and are pruned on the next write.
#[derive(Debug, Clone)]
pub struct InMemoryCache<C> {
    ttl: TimeDelta,
    clock: Arc<C>,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl<C> InMemoryCache<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty cache with the given freshness window and clock.
    #[must_use]
    pub fn new(config: CacheConfig, clock: Arc<C>) -> Self {
        Self {
            ttl: TimeDelta::from_std(config.ttl()).unwrap_or(TimeDelta::MAX),
            clock,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored entries, expired ones included.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty cache. For error-propagating access, use the
    /// cache trait methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn lock_error(err: impl std::fmt::Display) -> CacheError {
    CacheError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> ListingCache for InMemoryCache<C>
where
    C: Clock + Send + Sync,
{
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<serde_json::Value>> {
        let guard = self.entries.read().map_err(lock_error)?;
        let now = self.clock.utc();
        Ok(guard
            .get(key.as_str())
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &CacheKey, value: serde_json::Value) -> CacheResult<()> {
        let mut guard = self.entries.write().map_err(lock_error)?;
        let now = self.clock.utc();
        guard.retain(|_, entry| entry.expires_at > now);
        guard.insert(
            key.as_str().to_owned(),
            CacheEntry {
                value,
                expires_at: self.expiry(now),
            },
        );
        Ok(())
    }

    async fn forget(&self, key: &CacheKey) -> CacheResult<()> {
        let mut guard = self.entries.write().map_err(lock_error)?;
        guard.remove(key.as_str());
        Ok(())
    }

    async fn forget_prefix(&self, prefix: &str) -> CacheResult<()> {
        let mut guard = self.entries.write().map_err(lock_error)?;
        guard.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
