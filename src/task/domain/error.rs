//! Error types for task domain validation, guards, and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing task domain values or validating
/// lifecycle rules.
///
/// Every variant belongs to the "validation" class of the published error
/// taxonomy: the request was understood but violates a domain rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title contains characters outside alphanumerics, spaces,
    /// and hyphens.
    #[error(
        "task title '{0}' contains invalid characters (only alphanumeric, spaces, and hyphens allowed)"
    )]
    InvalidTitle(String),

    /// The task title exceeds the 255-character storage limit.
    #[error("task title exceeds 255 character limit: {0}")]
    TitleTooLong(String),

    /// The task description exceeds the 1000-character storage limit.
    #[error("task description exceeds 1000 character limit")]
    DescriptionTooLong,

    /// The due date lies before the day the task is created.
    #[error("due date {0} must not lie before the creation day")]
    DueDateInPast(chrono::NaiveDate),

    /// Completing a task requires it to be in progress first.
    #[error("Cannot change status to Completed unless current status is In Progress")]
    CompletedRequiresInProgress {
        /// The task whose transition was rejected.
        task_id: TaskId,
        /// The status the task currently holds.
        current: TaskStatus,
    },

    /// A completed task cannot be moved back to in progress.
    #[error("Cannot change status to In Progress after it has been marked as Completed")]
    ReopenAfterCompleted {
        /// The task whose transition was rejected.
        task_id: TaskId,
    },

    /// Starting or completing a task requires every direct dependency to be
    /// completed.
    #[error("Cannot change task status due to incomplete dependencies")]
    IncompleteDependencies {
        /// The task whose transition was rejected.
        task_id: TaskId,
        /// How many direct dependencies are not yet completed.
        incomplete: usize,
    },

    /// The submitted dependency set contains the task itself.
    #[error("Task cannot depend on itself")]
    SelfDependency(TaskId),

    /// The submitted dependency set would close a cycle.
    #[error("Circular dependency detected")]
    CircularDependency {
        /// The task whose dependency set was rejected.
        task_id: TaskId,
        /// The proposed dependency that closes the cycle.
        dependency_id: TaskId,
    },
}

/// Error returned while parsing a task status from its storage form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task kind from its storage form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);

/// Error returned while parsing a task priority from its storage form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
