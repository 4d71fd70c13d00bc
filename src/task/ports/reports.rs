//! Queue port for deferred report generation.

use crate::access::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for report queue operations.
pub type ReportQueueResult<T> = Result<T, ReportQueueError>;

/// Request to generate a daily tasks report for one user.
///
/// Jobs are processed by an external background runner; the engine only
/// enqueues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportJob {
    /// User the report is generated for.
    pub requested_by: UserId,
    /// When the job was enqueued.
    pub requested_at: DateTime<Utc>,
}

/// Queue contract for deferred report jobs.
#[async_trait]
pub trait ReportQueue: Send + Sync {
    /// Enqueues a report job for background processing.
    ///
    /// # Errors
    ///
    /// Returns [`ReportQueueError::Queue`] when the job cannot be
    /// enqueued. Callers treat the failure as isolated: it never affects
    /// the operation that triggered the job.
    async fn enqueue(&self, job: ReportJob) -> ReportQueueResult<()>;
}

/// Errors returned by report queue implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportQueueError {
    /// The job could not be handed to the queue backend.
    #[error("report queue error: {0}")]
    Queue(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportQueueError {
    /// Wraps a queue backend error.
    pub fn queue(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Queue(Arc::new(err))
    }
}
