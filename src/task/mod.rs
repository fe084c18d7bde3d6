//! GTD tasks and projects.
//!
//! A task moves through the GTD statuses (`inbox`, `next`, `waiting`,
//! `scheduled`, `someday`, `done`, `project`, `reference`) without guards;
//! any status is reachable from any other. Deletion is soft: deleted tasks
//! stay in storage but disappear from every read. The module follows
//! hexagonal architecture:
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
