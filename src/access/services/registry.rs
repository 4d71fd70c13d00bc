//! Role registry resolving permissions transitively through role membership.

use super::TaskAction;
use crate::access::domain::{Actor, PermissionName, Role, RoleName};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by role-registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessControlError {
    /// A role with the same name is already defined.
    #[error("role already defined: {0}")]
    DuplicateRole(RoleName),

    /// The named role is not defined.
    #[error("unknown role: {0}")]
    UnknownRole(RoleName),
}

/// Registry of defined roles and the permissions each grants.
///
/// Authorization resolves through this registry only: an actor holds a
/// permission when at least one of its role claims maps to a defined role
/// granting that permission. There are no per-user grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    roles: BTreeMap<RoleName, Role>,
}

impl AccessControl {
    /// Creates a registry with no roles defined.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// Creates a registry seeded with the built-in roles.
    ///
    /// - `admin`: every task permission.
    /// - `manager`: every task permission except listing all tasks; most
    ///   actions are further scoped to tasks the manager created by the
    ///   policy's ownership rules.
    /// - `user`: `task.view` only.
    #[must_use]
    pub fn builtin() -> Self {
        let all_permissions = TaskAction::ALL.map(TaskAction::permission);
        let manager_permissions = TaskAction::ALL
            .into_iter()
            .filter(|action| *action != TaskAction::ListAll)
            .map(TaskAction::permission);

        let mut registry = Self::new();
        registry.roles.insert(
            RoleName::admin(),
            Role::new(RoleName::admin()).with_permissions(all_permissions),
        );
        registry.roles.insert(
            RoleName::manager(),
            Role::new(RoleName::manager()).with_permissions(manager_permissions),
        );
        registry.roles.insert(
            RoleName::user(),
            Role::new(RoleName::user()).with_permissions([TaskAction::View.permission()]),
        );
        registry
    }

    /// Defines a new role.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::DuplicateRole`] when a role with the
    /// same name already exists.
    pub fn define_role(&mut self, role: Role) -> Result<(), AccessControlError> {
        if self.roles.contains_key(role.name()) {
            return Err(AccessControlError::DuplicateRole(role.name().clone()));
        }
        self.roles.insert(role.name().clone(), role);
        Ok(())
    }

    /// Removes a role, returning its definition.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::UnknownRole`] when the role is not
    /// defined.
    pub fn remove_role(&mut self, name: &RoleName) -> Result<Role, AccessControlError> {
        self.roles
            .remove(name)
            .ok_or_else(|| AccessControlError::UnknownRole(name.clone()))
    }

    /// Grants a permission to an existing role.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::UnknownRole`] when the role is not
    /// defined.
    pub fn grant(
        &mut self,
        name: &RoleName,
        permission: PermissionName,
    ) -> Result<(), AccessControlError> {
        let role = self
            .roles
            .get_mut(name)
            .ok_or_else(|| AccessControlError::UnknownRole(name.clone()))?;
        role.grant(permission);
        Ok(())
    }

    /// Revokes a permission from an existing role, returning `true` when the
    /// permission was held.
    ///
    /// # Errors
    ///
    /// Returns [`AccessControlError::UnknownRole`] when the role is not
    /// defined.
    pub fn revoke(
        &mut self,
        name: &RoleName,
        permission: &PermissionName,
    ) -> Result<bool, AccessControlError> {
        let role = self
            .roles
            .get_mut(name)
            .ok_or_else(|| AccessControlError::UnknownRole(name.clone()))?;
        Ok(role.revoke(permission))
    }

    /// Returns the definition of a role, when defined.
    #[must_use]
    pub fn role(&self, name: &RoleName) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Returns `true` when any of the actor's role claims grants the
    /// permission.
    ///
    /// Role claims that do not match a defined role are ignored.
    #[must_use]
    pub fn has_permission(&self, actor: &Actor, permission: &PermissionName) -> bool {
        actor
            .roles()
            .iter()
            .any(|name| self.roles.get(name).is_some_and(|role| role.allows(permission)))
    }
}
