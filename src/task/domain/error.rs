//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating or constructing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    InvalidTitle,

    /// The status value is not part of the GTD status set.
    #[error("invalid task status: {0}")]
    InvalidStatus(String),

    /// A text field contains a NUL character, which `PostgreSQL` text
    /// columns cannot store.
    #[error("task {0} must not contain NUL characters")]
    NulCharacter(&'static str),

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwnerId,

    /// The energy level value is unsupported.
    #[error("invalid energy level: {0}")]
    InvalidEnergyLevel(String),

    /// The timeframe value is unsupported.
    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),
}
