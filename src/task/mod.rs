//! Task records, lifecycle engine, and orchestration services.
//!
//! This module implements the task aggregate with its soft-delete
//! semantics, the dependency graph with cycle detection, the guarded
//! status machine with one-level cascading to dependents, immutable
//! status-change audit records, and the services that tie them together
//! over pluggable storage, cache, and report-queue ports. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
