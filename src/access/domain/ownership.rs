//! Ownership facts about a resource, as seen by the policy.

use super::UserId;

/// The identity facts a policy rule may compare against the actor.
///
/// Resources expose who created them and who they are assigned to; the
/// policy never sees the resource itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    /// The user who created the resource.
    pub created_by: UserId,
    /// The user the resource is currently assigned to, if any.
    pub assigned_to: Option<UserId>,
}

impl Ownership {
    /// Creates ownership facts from creator and optional assignee.
    #[must_use]
    pub const fn new(created_by: UserId, assigned_to: Option<UserId>) -> Self {
        Self {
            created_by,
            assigned_to,
        }
    }
}
