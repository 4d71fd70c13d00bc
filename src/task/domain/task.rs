//! Task aggregate root and related lifecycle types.

use super::{TaskDescription, TaskDomainError, TaskId, TaskKind, TaskPriority, TaskStatus, TaskTitle};
use crate::access::domain::{Ownership, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Tasks are soft-deletable: [`Task::deleted_at`] records when a task was
/// trashed, and trashed tasks stay invisible to ordinary reads until
/// restored or purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    kind: TaskKind,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: NaiveDate,
    created_by: UserId,
    assigned_to: Option<UserId>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for creating a new task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated task title.
    pub title: TaskTitle,
    /// Validated task description, if any.
    pub description: Option<TaskDescription>,
    /// Task classification.
    pub kind: TaskKind,
    /// Task urgency.
    pub priority: TaskPriority,
    /// Calendar day the task is due.
    pub due_date: NaiveDate,
    /// User creating the task.
    pub created_by: UserId,
    /// User initially assigned to the task, if any.
    pub assigned_to: Option<UserId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task title.
    pub title: TaskTitle,
    /// Persisted task description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted task classification.
    pub kind: TaskKind,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted task urgency.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted creator identifier.
    pub created_by: UserId,
    /// Persisted assignee identifier, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted soft-delete timestamp, if any.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fully resolved field values for an in-place task edit.
///
/// Callers merge submitted fields with the stored task before building an
/// edit, so every field here is final. The edit never touches status,
/// assignment, or deletion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    /// Final task title.
    pub title: TaskTitle,
    /// Final task description, if any.
    pub description: Option<TaskDescription>,
    /// Final task classification.
    pub kind: TaskKind,
    /// Final task urgency.
    pub priority: TaskPriority,
    /// Final due date.
    pub due_date: NaiveDate,
}

impl Task {
    /// Creates a new task in [`TaskStatus::Open`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateInPast`] when the due date lies
    /// before the clock's current day.
    pub fn create(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        if data.due_date < timestamp.date_naive() {
            return Err(TaskDomainError::DueDateInPast(data.due_date));
        }

        Ok(Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            kind: data.kind,
            status: TaskStatus::Open,
            priority: data.priority,
            due_date: data.due_date,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            deleted_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            kind: data.kind,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            deleted_at: data.deleted_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the task classification.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the task urgency.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the calendar day the task is due.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the identifier of the user who created the task.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the identifier of the assigned user, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the soft-delete timestamp, if the task is trashed.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the task is currently trashed.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the ownership facts authorization rules evaluate against.
    #[must_use]
    pub const fn ownership(&self) -> Ownership {
        Ownership::new(self.created_by, self.assigned_to)
    }

    /// Validates a status transition against the lifecycle guards.
    ///
    /// `incomplete_dependencies` counts the task's direct dependencies that
    /// are not yet [`TaskStatus::Completed`]. Guards run in a fixed order:
    /// completion requires the task to be in progress, completed tasks
    /// cannot re-enter progress, and forward transitions require every
    /// dependency to be completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletedRequiresInProgress`],
    /// [`TaskDomainError::ReopenAfterCompleted`], or
    /// [`TaskDomainError::IncompleteDependencies`] when the matching guard
    /// rejects the transition.
    pub const fn check_transition(
        &self,
        next: TaskStatus,
        incomplete_dependencies: usize,
    ) -> Result<(), TaskDomainError> {
        if matches!(next, TaskStatus::Completed) && !matches!(self.status, TaskStatus::InProgress) {
            return Err(TaskDomainError::CompletedRequiresInProgress {
                task_id: self.id,
                current: self.status,
            });
        }
        if matches!(next, TaskStatus::InProgress) && matches!(self.status, TaskStatus::Completed) {
            return Err(TaskDomainError::ReopenAfterCompleted { task_id: self.id });
        }
        if matches!(next, TaskStatus::InProgress | TaskStatus::Completed)
            && incomplete_dependencies > 0
        {
            return Err(TaskDomainError::IncompleteDependencies {
                task_id: self.id,
                incomplete: incomplete_dependencies,
            });
        }
        Ok(())
    }

    /// Applies a fully resolved edit to the task.
    pub fn apply_edit(&mut self, edit: TaskEdit, clock: &impl Clock) {
        self.title = edit.title;
        self.description = edit.description;
        self.kind = edit.kind;
        self.priority = edit.priority;
        self.due_date = edit.due_date;
        self.touch(clock);
    }

    /// Assigns the task to a user, replacing any current assignee.
    pub fn set_assignee(&mut self, assignee: UserId, clock: &impl Clock) {
        self.assigned_to = Some(assignee);
        self.touch(clock);
    }

    /// Records an already-validated status transition.
    ///
    /// Guard evaluation happens in [`Task::check_transition`]; stores call
    /// this while committing a transition plan.
    pub(crate) fn apply_status(&mut self, next: TaskStatus, at: DateTime<Utc>) {
        self.status = next;
        self.updated_at = at;
    }

    /// Marks the task as trashed.
    pub(crate) fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    /// Clears the trashed marker.
    pub(crate) fn clear_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = None;
        self.updated_at = at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
