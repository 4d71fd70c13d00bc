//! Domain model for the task engine.
//!
//! The task domain models validated task creation and editing, the
//! dependency-guarded status state machine, soft-delete lifecycles for
//! tasks and their child records, immutable status-change audit rows,
//! and the dependency graph with its cycle check. Infrastructure concerns
//! stay outside the domain boundary.

mod audit;
mod children;
mod detail;
mod error;
mod filter;
mod graph;
mod ids;
mod kind;
mod priority;
mod status;
mod task;
mod title;

pub use audit::StatusChange;
pub use children::{Attachment, Comment, OwnerKind, OwnerRef};
pub use detail::{TaskDetail, TaskRef};
pub use error::{
    ParseTaskKindError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use filter::{DependsOnFilter, TaskFilter};
pub use graph::DependencyGraph;
pub use ids::{AttachmentId, CommentId, StatusChangeId, TaskId};
pub use kind::TaskKind;
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{NewTaskData, PersistedTaskData, Task, TaskEdit};
pub use title::{TaskDescription, TaskTitle};
