//! Single decision point for task authorization.
//!
//! Every task operation names a [`TaskAction`]; the policy combines the
//! permission that action requires (resolved through the role registry)
//! with the action's role/ownership rule. Call sites never test role
//! strings themselves.

use super::AccessControl;
use crate::access::domain::{Actor, Ownership, PermissionName, RoleName, UserId};
use std::fmt;
use thiserror::Error;

/// Actions the task service and lifecycle engine authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Create a new task.
    Create,
    /// View a single task.
    View,
    /// List tasks with filters.
    ListAll,
    /// Update a task's fields and dependency set.
    Update,
    /// Soft-delete a task and its cascade closure.
    Delete,
    /// Restore a soft-deleted task and its cascade closure.
    Restore,
    /// Permanently delete a task and its cascade closure.
    ForceDelete,
    /// List soft-deleted tasks.
    ListTrashed,
    /// List blocked tasks past their due date.
    ListBlocked,
    /// Assign a task to a user.
    Assign,
    /// Reassign a task to a different user.
    Reassign,
    /// Change a task's status through the lifecycle engine.
    Transition,
    /// Add a comment to a task.
    Comment,
    /// Record an attachment on a task.
    AttachFile,
}

impl TaskAction {
    /// Every action, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Create,
        Self::View,
        Self::ListAll,
        Self::Update,
        Self::Delete,
        Self::Restore,
        Self::ForceDelete,
        Self::ListTrashed,
        Self::ListBlocked,
        Self::Assign,
        Self::Reassign,
        Self::Transition,
        Self::Comment,
        Self::AttachFile,
    ];

    /// Returns the human-readable phrase used in denial messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create task",
            Self::View => "view task",
            Self::ListAll => "view tasks",
            Self::Update => "update task",
            Self::Delete => "destroy task",
            Self::Restore => "restore task",
            Self::ForceDelete => "force delete task",
            Self::ListTrashed => "view trashed tasks",
            Self::ListBlocked => "view blocked tasks",
            Self::Assign => "assign task",
            Self::Reassign => "reassign task",
            Self::Transition => "update task status",
            Self::Comment => "create comment",
            Self::AttachFile => "upload attachment",
        }
    }

    /// Returns the permission this action requires.
    #[must_use]
    pub fn permission(self) -> PermissionName {
        let name = match self {
            Self::Create => "task.create",
            Self::View => "task.view",
            Self::ListAll => "task.list",
            Self::Update => "task.update",
            Self::Delete => "task.delete",
            Self::Restore => "task.restore",
            Self::ForceDelete => "task.force_delete",
            Self::ListTrashed => "task.view_trashed",
            Self::ListBlocked => "task.view_blocked",
            Self::Assign => "task.assign",
            Self::Reassign => "task.reassign",
            Self::Transition => "task.update_status",
            Self::Comment => "task.comment",
            Self::AttachFile => "task.attach",
        };
        PermissionName::from_static(name)
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denial decision returned by [`TaskPolicy::authorize`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("user {actor} is not allowed to {action}")]
pub struct Forbidden {
    /// The actor that was denied.
    pub actor: UserId,
    /// The action that was denied.
    pub action: TaskAction,
}

/// Per-action authorization policy over (actor, action, resource).
///
/// A decision passes when the actor holds the action's permission through
/// the registry AND satisfies the action's role/ownership rule:
///
/// - `admin` passes every rule.
/// - `manager` may create and list trashed/blocked tasks, and may view,
///   update, delete, restore, force-delete, assign, reassign, and
///   transition only tasks it created.
/// - The assignee of a task may view it.
/// - Listing all tasks is admin-only.
/// - Commenting and attaching are gated by permission alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPolicy {
    access: AccessControl,
}

impl TaskPolicy {
    /// Creates a policy over the given role registry.
    #[must_use]
    pub const fn new(access: AccessControl) -> Self {
        Self { access }
    }

    /// Creates a policy over the built-in role registry.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(AccessControl::builtin())
    }

    /// Returns the underlying role registry.
    #[must_use]
    pub const fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Authorizes `actor` to perform `action`, optionally against a
    /// resource's ownership facts.
    ///
    /// Actions with an ownership rule (view, update, delete, restore, force
    /// delete, assign, reassign, transition) deny non-admin actors when
    /// `resource` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Forbidden`] when the actor lacks the required permission or
    /// fails the action's role/ownership rule.
    pub fn authorize(
        &self,
        actor: &Actor,
        action: TaskAction,
        resource: Option<&Ownership>,
    ) -> Result<(), Forbidden> {
        let denied = Forbidden {
            actor: actor.id(),
            action,
        };

        if !self.access.has_permission(actor, &action.permission()) {
            return Err(denied);
        }

        if !object_rule(actor, action, resource) {
            return Err(denied);
        }

        Ok(())
    }

    /// Returns `true` when [`TaskPolicy::authorize`] would pass.
    #[must_use]
    pub fn allows(&self, actor: &Actor, action: TaskAction, resource: Option<&Ownership>) -> bool {
        self.authorize(actor, action, resource).is_ok()
    }
}

/// Role/ownership rule per action, evaluated after the permission gate.
fn object_rule(actor: &Actor, action: TaskAction, resource: Option<&Ownership>) -> bool {
    if actor.has_role(&RoleName::admin()) {
        return true;
    }

    let is_manager = actor.has_role(&RoleName::manager());
    let is_creator = resource.is_some_and(|r| r.created_by == actor.id());
    let is_assignee = resource.is_some_and(|r| r.assigned_to == Some(actor.id()));

    match action {
        TaskAction::Create | TaskAction::ListTrashed | TaskAction::ListBlocked => is_manager,
        TaskAction::ListAll => false,
        TaskAction::View => (is_manager && is_creator) || is_assignee,
        TaskAction::Update
        | TaskAction::Delete
        | TaskAction::Restore
        | TaskAction::ForceDelete
        | TaskAction::Assign
        | TaskAction::Reassign
        | TaskAction::Transition => is_manager && is_creator,
        TaskAction::Comment | TaskAction::AttachFile => true,
    }
}
