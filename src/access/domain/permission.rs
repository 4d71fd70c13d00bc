//! Validated permission name type.

use super::AccessDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a permission name.
const MAX_PERMISSION_NAME_LENGTH: usize = 100;

/// Validated, dot-namespaced permission identifier.
///
/// Permission names are lowercase alphanumeric with underscores, namespaced
/// by dots (e.g. `task.view`, `task.update_status`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionName(String);

impl PermissionName {
    /// Creates a validated permission name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_.]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDomainError::EmptyPermissionName`] when the value is
    /// empty after trimming, [`AccessDomainError::InvalidPermissionName`]
    /// when it contains characters outside `[a-z0-9_.]`, or
    /// [`AccessDomainError::PermissionNameTooLong`] when it exceeds 100
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AccessDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(AccessDomainError::EmptyPermissionName);
        }

        if normalized.len() > MAX_PERMISSION_NAME_LENGTH {
            return Err(AccessDomainError::PermissionNameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');

        if !is_valid {
            return Err(AccessDomainError::InvalidPermissionName(raw));
        }

        Ok(Self(normalized))
    }

    /// Wraps a built-in permission name without validation.
    ///
    /// Only for the fixed set of names the crate itself defines; external
    /// input must go through [`PermissionName::new`].
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(name.to_owned())
    }

    /// Returns the permission name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PermissionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
