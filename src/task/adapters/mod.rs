//! Adapter implementations for the task engine ports.
//!
//! Adapters handle all infrastructure concerns while the domain remains
//! pure. The in-memory family backs the test suite and doubles as a
//! reference for transactional backends: every mutating store method is
//! one atomic unit.

pub mod memory;
