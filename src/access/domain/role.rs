//! Validated role name and the role aggregate holding its permission set.

use super::{AccessDomainError, PermissionName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for a role name.
const MAX_ROLE_NAME_LENGTH: usize = 64;

/// Validated, lowercase alphanumeric-plus-underscores role identifier.
///
/// Role names are the unit of authorization scoping (e.g. `admin`,
/// `manager`, `user`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDomainError::EmptyRoleName`] when the value is empty
    /// after trimming, [`AccessDomainError::InvalidRoleName`] when it
    /// contains characters outside `[a-z0-9_]`, or
    /// [`AccessDomainError::RoleNameTooLong`] when it exceeds 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AccessDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(AccessDomainError::EmptyRoleName);
        }

        if normalized.len() > MAX_ROLE_NAME_LENGTH {
            return Err(AccessDomainError::RoleNameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if !is_valid {
            return Err(AccessDomainError::InvalidRoleName(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the built-in superuser role name.
    #[must_use]
    pub fn admin() -> Self {
        Self("admin".to_owned())
    }

    /// Returns the built-in manager role name.
    #[must_use]
    pub fn manager() -> Self {
        Self("manager".to_owned())
    }

    /// Returns the built-in read-only role name.
    #[must_use]
    pub fn user() -> Self {
        Self("user".to_owned())
    }

    /// Returns the role name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named role and the permissions it grants.
///
/// Permissions are only ever granted through roles; there are no per-user
/// grants anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: RoleName,
    permissions: BTreeSet<PermissionName>,
}

impl Role {
    /// Creates a role with an empty permission set.
    #[must_use]
    pub const fn new(name: RoleName) -> Self {
        Self {
            name,
            permissions: BTreeSet::new(),
        }
    }

    /// Adds a set of permissions to the role.
    #[must_use]
    pub fn with_permissions(
        mut self,
        permissions: impl IntoIterator<Item = PermissionName>,
    ) -> Self {
        self.permissions.extend(permissions);
        self
    }

    /// Returns the role name.
    #[must_use]
    pub const fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the granted permission set.
    #[must_use]
    pub const fn permissions(&self) -> &BTreeSet<PermissionName> {
        &self.permissions
    }

    /// Grants a permission. Granting an already-held permission is a no-op.
    pub fn grant(&mut self, permission: PermissionName) {
        self.permissions.insert(permission);
    }

    /// Revokes a permission, returning `true` when it was held.
    pub fn revoke(&mut self, permission: &PermissionName) -> bool {
        self.permissions.remove(permission)
    }

    /// Returns `true` when the role grants the given permission.
    #[must_use]
    pub fn allows(&self, permission: &PermissionName) -> bool {
        self.permissions.contains(permission)
    }
}
