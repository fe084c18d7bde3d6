//! GTD status buckets.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The GTD bucket a task currently sits in.
///
/// Any status may be reached from any other; see the `mark_as_*` methods on
/// [`Task`](super::Task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Captured but not yet processed.
    Inbox,
    /// Next physical action.
    Next,
    /// Delegated and waiting on someone else.
    Waiting,
    /// Deferred to a specific date.
    Scheduled,
    /// Someday/maybe.
    Someday,
    /// Completed.
    Done,
    /// Multi-step outcome containing other tasks.
    Project,
    /// Reference material, not actionable.
    Reference,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 8] = [
        Self::Inbox,
        Self::Next,
        Self::Waiting,
        Self::Scheduled,
        Self::Someday,
        Self::Done,
        Self::Project,
        Self::Reference,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Next => "next",
            Self::Waiting => "waiting",
            Self::Scheduled => "scheduled",
            Self::Someday => "someday",
            Self::Done => "done",
            Self::Project => "project",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "inbox" => Ok(Self::Inbox),
            "next" => Ok(Self::Next),
            "waiting" => Ok(Self::Waiting),
            "scheduled" => Ok(Self::Scheduled),
            "someday" => Ok(Self::Someday),
            "done" => Ok(Self::Done),
            "project" => Ok(Self::Project),
            "reference" => Ok(Self::Reference),
            _ => Err(TaskDomainError::InvalidStatus(value.to_owned())),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
