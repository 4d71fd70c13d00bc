//! Unit tests for the access module.
//!
//! Tests are organised by concern: domain value validation, registry
//! resolution, and policy decisions.
