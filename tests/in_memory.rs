//! In-memory task engine integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `dependency_flow_tests`: lifecycle guards and dependency cascades
//! - `delete_cascade_tests`: soft-delete, restore, and purge closures
//! - `authorization_tests`: role and ownership scoping
//! - `listing_tests`: filters, duplicate titles, caching, invalidation

mod in_memory {
    pub mod helpers;

    mod authorization_tests;
    mod delete_cascade_tests;
    mod dependency_flow_tests;
    mod listing_tests;
}
