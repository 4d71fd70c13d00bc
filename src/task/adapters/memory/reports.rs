//! In-memory report queue that records enqueued jobs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::ports::{ReportJob, ReportQueue, ReportQueueError, ReportQueueResult};

/// Report queue that keeps every enqueued job in memory.
///
/// Suitable for tests asserting on dispatch behaviour; no background
/// processing happens.
#[derive(Debug, Clone, Default)]
pub struct RecordingReportQueue {
    jobs: Arc<RwLock<Vec<ReportJob>>>,
}

impl RecordingReportQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the enqueued jobs in order.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn jobs(&self) -> Vec<ReportJob> {
        self.jobs.read().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReportQueue for RecordingReportQueue {
    async fn enqueue(&self, job: ReportJob) -> ReportQueueResult<()> {
        let mut guard = self
            .jobs
            .write()
            .map_err(|err| ReportQueueError::queue(std::io::Error::other(err.to_string())))?;
        guard.push(job);
        Ok(())
    }
}
