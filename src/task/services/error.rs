//! Published error taxonomy of the task services.

use crate::access::services::Forbidden;
use crate::task::domain::{TaskDomainError, TaskId};
use crate::task::ports::{CacheError, TaskStoreError};
use thiserror::Error;

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Errors published by the task services.
///
/// This is the taxonomy outer layers translate into transport responses:
/// `Unauthorized` maps to a 403-equivalent, `NotFound` to 404,
/// `Validation` and its siblings to 422, `Conflict` to 409, and
/// `Internal` to 500. Internal causes are logged with their operation
/// context and never leaked verbatim to the caller.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// The actor is not allowed to perform the action.
    #[error(transparent)]
    Unauthorized(#[from] Forbidden),

    /// The task does not exist or is not visible to this operation.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A domain rule rejected the request.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Another live task already uses the submitted title.
    #[error("task title '{0}' is already taken")]
    DuplicateTitle(String),

    /// A submitted dependency does not exist among live tasks.
    #[error("dependency task {0} does not exist")]
    UnknownDependency(TaskId),

    /// A concurrent writer changed the task after this operation read it.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),

    /// An infrastructure failure occurred; details are in the logs.
    #[error("internal error")]
    Internal,
}

/// Translates a store failure into the published taxonomy.
///
/// Persistence failures are logged here with their operation context and
/// collapsed into [`TaskServiceError::Internal`]; everything else maps to
/// a semantically equivalent service error.
pub(crate) fn store_failure(operation: &'static str, err: TaskStoreError) -> TaskServiceError {
    match err {
        TaskStoreError::NotFound(id) => TaskServiceError::NotFound(id),
        TaskStoreError::DuplicateTitle(title) => TaskServiceError::DuplicateTitle(title),
        TaskStoreError::UnknownDependency(id) => TaskServiceError::UnknownDependency(id),
        TaskStoreError::SelfDependency(id) => {
            TaskServiceError::Validation(TaskDomainError::SelfDependency(id))
        }
        TaskStoreError::DependencyCycle {
            task_id,
            dependency_id,
        } => TaskServiceError::Validation(TaskDomainError::CircularDependency {
            task_id,
            dependency_id,
        }),
        TaskStoreError::StatusConflict { task_id, .. } => TaskServiceError::Conflict(task_id),
        TaskStoreError::CommentNotFound(id) => {
            tracing::error!(operation, comment_id = %id, "comment lookup failed");
            TaskServiceError::Internal
        }
        TaskStoreError::AttachmentNotFound(id) => {
            tracing::error!(operation, attachment_id = %id, "attachment lookup failed");
            TaskServiceError::Internal
        }
        TaskStoreError::Persistence(source) => {
            tracing::error!(operation, error = %source, "task store failure");
            TaskServiceError::Internal
        }
    }
}

/// Translates a cache read or write failure into the published taxonomy.
pub(crate) fn cache_failure(operation: &'static str, err: CacheError) -> TaskServiceError {
    let CacheError::Backend(source) = err;
    tracing::error!(operation, error = %source, "cache backend failure");
    TaskServiceError::Internal
}
