//! Task listing filters and their cache signature.

use super::{Task, TaskId, TaskKind, TaskPriority, TaskStatus};
use crate::access::domain::UserId;
use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Dependency-shaped listing criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependsOnFilter {
    /// Match tasks with no dependencies at all.
    WithoutDependencies,
    /// Match tasks that directly depend on the given task.
    OnTask(TaskId),
}

/// Criteria for listing tasks.
///
/// Unset fields match everything. The filter serializes deterministically,
/// which makes [`TaskFilter::signature`] stable across identical queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    kind: Option<TaskKind>,
    assigned_to: Option<UserId>,
    due_date: Option<NaiveDate>,
    depends_on: Option<DependsOnFilter>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            priority: None,
            kind: None,
            assigned_to: None,
            due_date: None,
            depends_on: None,
        }
    }

    /// Restricts the filter to tasks in the given status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to tasks with the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts the filter to tasks of the given kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts the filter to tasks assigned to the given user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Restricts the filter to tasks due on the given day.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Restricts the filter by dependency shape.
    #[must_use]
    pub const fn with_depends_on(mut self, depends_on: DependsOnFilter) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    /// Returns the status criterion, if set.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the priority criterion, if set.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the kind criterion, if set.
    #[must_use]
    pub const fn kind(&self) -> Option<TaskKind> {
        self.kind
    }

    /// Returns the assignee criterion, if set.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the due-date criterion, if set.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the dependency criterion, if set.
    #[must_use]
    pub const fn depends_on(&self) -> Option<DependsOnFilter> {
        self.depends_on
    }

    /// Returns whether the task-level criteria match the given task.
    ///
    /// The dependency criterion is not evaluated here; stores resolve it
    /// against their edge data.
    #[must_use]
    pub fn matches_task(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self.kind.is_none_or(|kind| task.kind() == kind)
            && self
                .assigned_to
                .is_none_or(|assignee| task.assigned_to() == Some(assignee))
            && self.due_date.is_none_or(|due| task.due_date() == due)
    }

    /// Returns a stable hex digest identifying this filter combination.
    ///
    /// Equal filters produce equal signatures, so cached listings for the
    /// same criteria share one cache entry.
    #[must_use]
    pub fn signature(&self) -> String {
        let encoded = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(encoded.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
