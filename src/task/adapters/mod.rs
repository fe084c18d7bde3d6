//! Adapter implementations of the task storage port.
//!
//! - [`memory`]: lock-guarded map, used in tests and single-process setups
//! - [`postgres`]: Diesel-backed `PostgreSQL` store

pub mod memory;
pub mod postgres;
