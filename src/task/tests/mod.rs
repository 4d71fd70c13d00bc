//! Unit tests for the task module.
//!
//! Tests are organised by concern: domain value validation, the status
//! guard matrix, dependency-graph reachability, the in-memory store and
//! cache adapters, and the orchestration services.

mod graph_tests;
