//! GTD task core: the task and project model of a Getting Things Done
//! application, with interchangeable storage backends.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: task entity, statuses and transition rules
//! - **Ports**: the [`task::ports::TaskStore`] contract
//! - **Adapters**: in-memory and `PostgreSQL` stores
//! - **Services**: owner-scoped workflows built on the store contract
//!
//! # Modules
//!
//! - [`config`]: database settings from the environment
//! - [`task`]: tasks, projects, storage and workflows

pub mod config;
pub mod task;
