//! Application services for the task subsystem.
//!
//! Services orchestrate domain operations and coordinate between ports,
//! enforcing the policy checks and cache discipline every operation
//! shares.

mod error;
mod status;
mod tasks;

pub use error::{TaskServiceError, TaskServiceResult};
pub use status::StatusEngine;
pub use tasks::{CreateTaskRequest, TaskService, UpdateTaskRequest};
