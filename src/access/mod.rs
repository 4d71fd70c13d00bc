//! Role-scoped authorization for the task engine.
//!
//! This module implements the permission model: validated role and
//! permission names, the acting-user identity, a registry resolving
//! permissions transitively through role membership, and a single
//! per-action policy combining the permission gate with role/ownership
//! rules. It has no storage of its own; role claims arrive with each call
//! from the external identity provider.
//!
//! - Domain types in [`domain`]
//! - Registry and policy in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
