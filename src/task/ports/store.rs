//! Store port for task persistence, tree cascades, and transition commits.

use crate::access::domain::UserId;
use crate::task::domain::{
    Attachment, AttachmentId, Comment, CommentId, StatusChange, Task, TaskDetail, TaskFilter,
    TaskId, TaskStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Single status write inside a transition plan.
///
/// `expected` records the status the planner observed; the store rejects
/// the whole plan when any task has moved on since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWrite {
    /// Task the write applies to.
    pub task_id: TaskId,
    /// Status the task must still hold for the plan to commit.
    pub expected: TaskStatus,
    /// Status the task moves to.
    pub next: TaskStatus,
}

/// Atomic batch of status writes produced by one transition.
///
/// The first write targets the task the caller transitioned; any further
/// writes carry the dependency cascade. Committing the plan appends one
/// audit record per write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// User who initiated the transition.
    pub changed_by: UserId,
    /// Timestamp stamped on every write and audit record.
    pub changed_at: DateTime<Utc>,
    /// Ordered status writes to apply.
    pub writes: Vec<StatusWrite>,
}

/// Task persistence contract.
///
/// Every mutating operation is a single atomic unit: either all of its
/// writes (task fields, dependency edges, audit rows, child cascades)
/// become visible together, or none do.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task with its dependency edges.
    ///
    /// Dependency validation is part of the insert: every referenced task
    /// must exist and be live, and no edge may close a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTitle`] when a live task already
    /// uses the title, [`TaskStoreError::UnknownDependency`],
    /// [`TaskStoreError::SelfDependency`], or
    /// [`TaskStoreError::DependencyCycle`] when the edge set is invalid.
    async fn insert(&self, task: &Task, dependencies: &BTreeSet<TaskId>) -> TaskStoreResult<()>;

    /// Persists changes to an existing task, optionally replacing its
    /// dependency edges.
    ///
    /// Passing `None` for `dependencies` leaves the edge set untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// [`TaskStoreError::DuplicateTitle`] when another live task uses the
    /// title, or the same edge-validation errors as
    /// [`TaskStore::insert`].
    async fn update(
        &self,
        task: &Task,
        dependencies: Option<&BTreeSet<TaskId>>,
    ) -> TaskStoreResult<()>;

    /// Finds a live task by identifier.
    ///
    /// Returns `None` when the task does not exist or is trashed.
    async fn find(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Finds a task by identifier, including trashed tasks.
    async fn find_with_deleted(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Loads a live task with its relations.
    ///
    /// Returns `None` when the task does not exist or is trashed. Only
    /// live comments and attachments are included.
    async fn detail(&self, id: TaskId) -> TaskStoreResult<Option<TaskDetail>>;

    /// Lists live tasks matching the filter.
    async fn list(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Lists live blocked tasks whose due date lies before the given day.
    async fn list_blocked_before(&self, day: NaiveDate) -> TaskStoreResult<Vec<Task>>;

    /// Lists trashed tasks with their relations, including trashed
    /// children.
    async fn list_trashed(&self) -> TaskStoreResult<Vec<TaskDetail>>;

    /// Returns the live tasks the given task directly depends on.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn dependencies_of(&self, id: TaskId) -> TaskStoreResult<Vec<Task>>;

    /// Returns the live tasks that directly depend on the given task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn dependents_of(&self, id: TaskId) -> TaskStoreResult<Vec<Task>>;

    /// Returns the audit trail of a task, oldest first.
    async fn status_history(&self, id: TaskId) -> TaskStoreResult<Vec<StatusChange>>;

    /// Atomically applies a transition plan and appends its audit records.
    ///
    /// Each write is checked against its expected status before anything
    /// is applied; on any mismatch the whole plan is rejected unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when a planned task is missing
    /// or trashed, or [`TaskStoreError::StatusConflict`] when a task moved
    /// since the plan was built.
    async fn commit_transition(&self, plan: &TransitionPlan) -> TaskStoreResult<Vec<StatusChange>>;

    /// Soft-deletes a task, its child records, and recursively every
    /// dependent with its child records.
    ///
    /// Returns the task identifiers trashed, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the root does not exist
    /// or is already trashed.
    async fn delete_tree(&self, root: TaskId, at: DateTime<Utc>) -> TaskStoreResult<Vec<TaskId>>;

    /// Restores a trashed task and recursively every trashed dependent,
    /// together with their child records.
    ///
    /// Returns the task identifiers restored, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the root does not exist
    /// or is not trashed.
    async fn restore_tree(&self, root: TaskId, at: DateTime<Utc>) -> TaskStoreResult<Vec<TaskId>>;

    /// Permanently removes a task and recursively every dependent,
    /// together with their child records, audit rows, and incident edges.
    ///
    /// Returns the task identifiers removed, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the root does not exist.
    async fn purge_tree(&self, root: TaskId) -> TaskStoreResult<Vec<TaskId>>;

    /// Returns every comment on a task, trashed ones included.
    async fn comments_of(&self, id: TaskId) -> TaskStoreResult<Vec<Comment>>;

    /// Returns every attachment on a task, trashed ones included.
    async fn attachments_of(&self, id: TaskId) -> TaskStoreResult<Vec<Attachment>>;

    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the owning task does not
    /// exist or is trashed.
    async fn add_comment(&self, comment: &Comment) -> TaskStoreResult<()>;

    /// Stores a new attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the owning task does not
    /// exist or is trashed.
    async fn add_attachment(&self, attachment: &Attachment) -> TaskStoreResult<()>;

    /// Soft-deletes a single comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::CommentNotFound`] when the comment does
    /// not exist.
    async fn remove_comment(&self, id: CommentId, at: DateTime<Utc>) -> TaskStoreResult<()>;

    /// Restores a single trashed comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::CommentNotFound`] when the comment does
    /// not exist.
    async fn restore_comment(&self, id: CommentId, at: DateTime<Utc>) -> TaskStoreResult<()>;

    /// Soft-deletes a single attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::AttachmentNotFound`] when the attachment
    /// does not exist.
    async fn remove_attachment(&self, id: AttachmentId, at: DateTime<Utc>) -> TaskStoreResult<()>;

    /// Restores a single trashed attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::AttachmentNotFound`] when the attachment
    /// does not exist.
    async fn restore_attachment(&self, id: AttachmentId, at: DateTime<Utc>) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found among live tasks.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another live task already uses the title.
    #[error("duplicate task title: {0}")]
    DuplicateTitle(String),

    /// A referenced dependency does not exist or is trashed.
    #[error("unknown dependency task: {0}")]
    UnknownDependency(TaskId),

    /// A task referenced itself as a dependency.
    #[error("task depends on itself: {0}")]
    SelfDependency(TaskId),

    /// A proposed dependency edge would close a cycle.
    #[error("dependency cycle between task {task_id} and dependency {dependency_id}")]
    DependencyCycle {
        /// Task whose edge set was rejected.
        task_id: TaskId,
        /// Proposed dependency that closes the cycle.
        dependency_id: TaskId,
    },

    /// A planned status write found the task in an unexpected status.
    #[error("status conflict on task {task_id}: expected {expected}, found {actual}")]
    StatusConflict {
        /// Task that moved since the plan was built.
        task_id: TaskId,
        /// Status the plan assumed.
        expected: TaskStatus,
        /// Status the store actually holds.
        actual: TaskStatus,
    },

    /// The comment was not found.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// The attachment was not found.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(AttachmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
