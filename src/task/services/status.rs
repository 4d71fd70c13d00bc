//! Status transition engine with dependency-aware cascading.

use super::error::{TaskServiceError, TaskServiceResult, store_failure};
use crate::access::domain::Actor;
use crate::access::services::{TaskAction, TaskPolicy};
use crate::task::domain::{StatusChange, TaskId, TaskStatus};
use crate::task::ports::{
    CacheKey, ListingCache, ReportJob, ReportQueue, StatusWrite, TaskStore, TransitionPlan,
};
use mockable::Clock;
use std::sync::Arc;

/// Task lifecycle engine.
///
/// Validates a requested status transition against the lifecycle guards,
/// plans the one-level dependency cascade, and commits the whole batch as
/// one atomic store call. After the commit it invalidates the cached
/// detail of every touched task and enqueues a daily-report job
/// fire-and-forget.
#[derive(Clone)]
pub struct StatusEngine<S, L, Q, C>
where
    S: TaskStore,
    L: ListingCache,
    Q: ReportQueue,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    cache: Arc<L>,
    reports: Arc<Q>,
    policy: Arc<TaskPolicy>,
    clock: Arc<C>,
}

impl<S, L, Q, C> StatusEngine<S, L, Q, C>
where
    S: TaskStore,
    L: ListingCache,
    Q: ReportQueue,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle engine.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        cache: Arc<L>,
        reports: Arc<Q>,
        policy: Arc<TaskPolicy>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            cache,
            reports,
            policy,
            clock,
        }
    }

    /// Transitions a task to `new_status` and cascades to its direct
    /// dependents.
    ///
    /// Returns the audit records appended by the commit, the transitioned
    /// task first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task is absent or
    /// trashed, [`TaskServiceError::Unauthorized`] when the actor fails
    /// the transition policy, [`TaskServiceError::Validation`] when a
    /// lifecycle guard rejects the change, and
    /// [`TaskServiceError::Conflict`] when a concurrent transition moved
    /// any touched task between planning and commit.
    pub async fn transition(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        actor: &Actor,
    ) -> TaskServiceResult<Vec<StatusChange>> {
        let task = self
            .store
            .find(task_id)
            .await
            .map_err(|err| store_failure("transition", err))?
            .ok_or(TaskServiceError::NotFound(task_id))?;

        self.policy
            .authorize(actor, TaskAction::Transition, Some(&task.ownership()))?;

        let dependencies = self
            .store
            .dependencies_of(task_id)
            .await
            .map_err(|err| store_failure("transition", err))?;
        let incomplete = dependencies
            .iter()
            .filter(|dependency| dependency.status() != TaskStatus::Completed)
            .count();
        task.check_transition(new_status, incomplete)?;

        let mut writes = vec![StatusWrite {
            task_id,
            expected: task.status(),
            next: new_status,
        }];
        writes.extend(self.plan_cascade(task_id, new_status).await?);

        let changed_at = self.clock.utc();
        let plan = TransitionPlan {
            changed_by: actor.id(),
            changed_at,
            writes,
        };
        let records = self
            .store
            .commit_transition(&plan)
            .await
            .map_err(|err| store_failure("transition", err))?;

        for write in &plan.writes {
            if let Err(err) = self.cache.forget(&CacheKey::task(write.task_id)).await {
                tracing::warn!(task_id = %write.task_id, error = %err, "cache invalidation failed");
            }
        }

        let job = ReportJob {
            requested_by: actor.id(),
            requested_at: changed_at,
        };
        if let Err(err) = self.reports.enqueue(job).await {
            tracing::warn!(user_id = %actor.id(), error = %err, "daily report dispatch failed");
        }

        Ok(records)
    }

    /// Plans the one-level cascade for the given transition.
    ///
    /// Completion may unblock direct dependents whose remaining
    /// dependencies are all completed; entering progress blocks every
    /// dependent not already blocked, recording its true prior status.
    /// Grand-dependents are never re-evaluated.
    async fn plan_cascade(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> TaskServiceResult<Vec<StatusWrite>> {
        let mut writes = Vec::new();
        if !matches!(new_status, TaskStatus::Completed | TaskStatus::InProgress) {
            return Ok(writes);
        }

        let dependents = self
            .store
            .dependents_of(task_id)
            .await
            .map_err(|err| store_failure("transition", err))?;

        if new_status == TaskStatus::Completed {
            for dependent in &dependents {
                if dependent.status() != TaskStatus::Blocked {
                    continue;
                }
                let dependencies = self
                    .store
                    .dependencies_of(dependent.id())
                    .await
                    .map_err(|err| store_failure("transition", err))?;
                // The completing task still holds its old status in the
                // store; count it as completed.
                let remaining = dependencies
                    .iter()
                    .filter(|dependency| dependency.id() != task_id)
                    .filter(|dependency| dependency.status() != TaskStatus::Completed)
                    .count();
                if remaining == 0 {
                    writes.push(StatusWrite {
                        task_id: dependent.id(),
                        expected: TaskStatus::Blocked,
                        next: TaskStatus::Open,
                    });
                }
            }
        } else {
            for dependent in &dependents {
                if dependent.status() == TaskStatus::Blocked {
                    continue;
                }
                writes.push(StatusWrite {
                    task_id: dependent.id(),
                    expected: dependent.status(),
                    next: TaskStatus::Blocked,
                });
            }
        }
        Ok(writes)
    }
}
