//! Foreman: task-management backend core.
//!
//! This crate provides the task state machine with dependency-aware status
//! propagation, role-scoped authorization, dependency-graph cycle detection,
//! and the orchestration service that ties them together over pluggable
//! storage, cache, and background-job ports.
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory today)
//!
//! # Modules
//!
//! - [`access`]: Roles, permissions, and the per-action task policy
//! - [`task`]: Task records, lifecycle engine, and orchestration services

pub mod access;
pub mod task;
