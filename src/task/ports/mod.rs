//! Port contracts for the task engine.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod cache;
pub mod reports;
pub mod store;

pub use cache::{CacheConfig, CacheError, CacheKey, CacheResult, ListingCache};
pub use reports::{ReportJob, ReportQueue, ReportQueueError, ReportQueueResult};
pub use store::{StatusWrite, TaskStore, TaskStoreError, TaskStoreResult, TransitionPlan};
