//! Error types for access-control domain validation.

use thiserror::Error;

/// Errors returned while constructing access-control domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDomainError {
    /// The role name is empty after trimming.
    #[error("role name must not be empty")]
    EmptyRoleName,

    /// The role name contains characters outside `[a-z0-9_]`.
    #[error(
        "role name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidRoleName(String),

    /// The role name exceeds the 64-character limit.
    #[error("role name exceeds 64 character limit: {0}")]
    RoleNameTooLong(String),

    /// The permission name is empty after trimming.
    #[error("permission name must not be empty")]
    EmptyPermissionName,

    /// The permission name contains characters outside `[a-z0-9_.]`.
    #[error(
        "permission name '{0}' contains invalid characters (only lowercase alphanumeric, underscores, and dots allowed)"
    )]
    InvalidPermissionName(String),

    /// The permission name exceeds the 100-character limit.
    #[error("permission name exceeds 100 character limit: {0}")]
    PermissionNameTooLong(String),
}
