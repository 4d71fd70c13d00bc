//! Acting-user identity as resolved by the external identity provider.

use super::RoleName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a user.
///
/// User records themselves live with the external identity provider; the
/// engine only ever compares identifiers (creator, assignee, acting user).
///
/// # Examples
///
/// ```
/// use foreman::access::domain::UserId;
///
/// let id = UserId::new();
/// assert!(!id.as_ref().is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for UserId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The acting user for a single call: identity plus role claims.
///
/// Actors are constructed at the boundary from whatever the identity
/// provider asserts; the engine never looks up users itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    roles: BTreeSet<RoleName>,
}

impl Actor {
    /// Creates an actor with no role claims.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            roles: BTreeSet::new(),
        }
    }

    /// Adds a single role claim.
    #[must_use]
    pub fn with_role(mut self, role: RoleName) -> Self {
        self.roles.insert(role);
        self
    }

    /// Adds a set of role claims.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleName>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role claims.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    /// Returns `true` when the actor carries the given role.
    #[must_use]
    pub fn has_role(&self, role: &RoleName) -> bool {
        self.roles.contains(role)
    }
}
