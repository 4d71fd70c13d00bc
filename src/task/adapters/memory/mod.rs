//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing and single-process use without external dependencies.

mod cache;
mod reports;
mod store;

pub use cache::InMemoryCache;
pub use reports::RecordingReportQueue;
pub use store::InMemoryTaskStore;
