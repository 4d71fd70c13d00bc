//! Read model for a task with its relations loaded.

use super::{Attachment, Comment, Task, TaskId, TaskTitle};
use serde::{Deserialize, Serialize};

/// Lightweight reference to a related task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    /// Identifier of the related task.
    pub id: TaskId,
    /// Title of the related task.
    pub title: TaskTitle,
}

impl TaskRef {
    /// Builds a reference from a task aggregate.
    #[must_use]
    pub fn of(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().clone(),
        }
    }
}

/// Task aggregate together with its loaded relations.
///
/// Stores assemble this projection for single-task reads; it is also the
/// value cached under the per-task cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// The task itself.
    pub task: Task,
    /// Tasks this task directly depends on.
    pub dependencies: Vec<TaskRef>,
    /// Tasks that directly depend on this task.
    pub dependents: Vec<TaskRef>,
    /// Live comments on the task.
    pub comments: Vec<Comment>,
    /// Live attachments on the task.
    pub attachments: Vec<Attachment>,
}
