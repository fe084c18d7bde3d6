//! Unit tests for the task module.
//!
//! Tests are organised by domain concept: entity construction, status
//! parsing, transitions, search matching, and the workflow service.


use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock that returns a fixed start instant and advances by `step` on every
/// reading.
pub(super) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub(super) fn starting_at(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    pub(super) fn frozen(at: DateTime<Utc>) -> Self {
        Self::starting_at(at, Duration::zero())
    }

    pub(super) fn set(&self, at: DateTime<Utc>) {
        *self.next.lock().expect("clock mutex poisoned") = at;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock mutex poisoned");
        let now = *next;
        *next = now + self.step;
        now
    }
}

pub(super) fn instant(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}
