//! Domain model for GTD tasks and projects.
//!
//! The domain holds the task aggregate, its status set and planning metadata,
//! and the search matching rules. It performs no I/O; time is read through a
//! [`mockable::Clock`].

mod error;
mod ids;
mod planning;
mod search;
mod status;
mod task;

pub use error::TaskDomainError;
pub use ids::{OwnerId, TaskId};
pub use planning::{EnergyLevel, Timeframe};
pub use search::SearchQuery;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task};
