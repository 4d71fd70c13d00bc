//! Immutable status-change audit records.

use super::{StatusChangeId, TaskId, TaskStatus};
use crate::access::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable audit record of a single status transition.
///
/// One record is appended per task touched by a transition, including
/// tasks moved by the dependency cascade. Records are never mutated; they
/// only disappear when the task they belong to is purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    id: StatusChangeId,
    task_id: TaskId,
    from: TaskStatus,
    to: TaskStatus,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
}

impl StatusChange {
    /// Records a status transition that has already been committed.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
        changed_by: UserId,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StatusChangeId::new(),
            task_id,
            from,
            to,
            changed_by,
            changed_at,
        }
    }

    /// Returns the audit record identifier.
    #[must_use]
    pub const fn id(&self) -> StatusChangeId {
        self.id
    }

    /// Returns the task the transition applied to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status the task held before the transition.
    #[must_use]
    pub const fn from(&self) -> TaskStatus {
        self.from
    }

    /// Returns the status the task holds after the transition.
    #[must_use]
    pub const fn to(&self) -> TaskStatus {
        self.to
    }

    /// Returns the user who initiated the transition.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns when the transition was committed.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
