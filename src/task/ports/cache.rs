//! Cache port for task reads, with key construction and invalidation.

use crate::task::domain::{TaskFilter, TaskId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key for a task-engine read.
///
/// Keys are namespaced strings: one key per task detail, one per filter
/// signature for listings, and one per day for the blocked listing. The
/// listing namespaces exist so invalidation can drop a whole family of
/// entries by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Prefix shared by every filtered-listing key.
    pub const LIST_PREFIX: &'static str = "task-list/";

    /// Prefix shared by every blocked-listing key.
    pub const BLOCKED_PREFIX: &'static str = "task-blocked/";

    /// Key of the cached detail view of one task.
    #[must_use]
    pub fn task(id: TaskId) -> Self {
        Self(format!("task/{id}"))
    }

    /// Key of the cached listing for one filter combination.
    #[must_use]
    pub fn list(filter: &TaskFilter) -> Self {
        Self(format!("{}{}", Self::LIST_PREFIX, filter.signature()))
    }

    /// Key of the cached blocked listing for one day.
    #[must_use]
    pub fn blocked(day: NaiveDate) -> Self {
        Self(format!("{}{day}", Self::BLOCKED_PREFIX))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Freshness window applied to every cached entry.
///
/// The window bounds staleness after a crash between a store commit and
/// the matching invalidation, so readers must tolerate entries up to this
/// old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    ttl: Duration,
}

impl CacheConfig {
    /// Default freshness window of one hour.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    /// Creates a config with the given freshness window.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Returns the freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

/// Cache contract for task reads.
///
/// Values are stored as JSON documents; callers serialize on put and
/// deserialize on get. A missing or expired entry reads as `None`.
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Returns the fresh value under `key`, if any.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<serde_json::Value>>;

    /// Stores `value` under `key` for the configured freshness window.
    async fn put(&self, key: &CacheKey, value: serde_json::Value) -> CacheResult<()>;

    /// Drops the entry under `key`, if any.
    async fn forget(&self, key: &CacheKey) -> CacheResult<()>;

    /// Drops every entry whose key starts with `prefix`.
    async fn forget_prefix(&self, prefix: &str) -> CacheResult<()>;
}

/// Errors returned by cache implementations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Cache backend failure.
    #[error("cache backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl CacheError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
