//! Domain model for roles, permissions, and acting users.
//!
//! The access domain models the role-to-permission mapping and the identity
//! facts an external identity provider asserts per call. No user records are
//! stored here; authorization resolves through role membership only.

mod actor;
mod error;
mod ownership;
mod permission;
mod role;

pub use actor::{Actor, UserId};
pub use error::AccessDomainError;
pub use ownership::Ownership;
pub use permission::PermissionName;
pub use role::{Role, RoleName};
