//! Role registry and the per-action authorization policy.

mod policy;
mod registry;

pub use policy::{Forbidden, TaskAction, TaskPolicy};
pub use registry::{AccessControl, AccessControlError};
