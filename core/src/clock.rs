//! Desk clock: the single source of "now".
//!
//! Engine functions take `now` as an argument. Callers obtain it from a
//! DeskClock so that tests can pin and advance time.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use std::cell::Cell;

pub trait DeskClock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl DeskClock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A pinned instant that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<Timestamp>,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self { current: Cell::new(at) }
    }

    /// Move forward. Returns the new instant.
    pub fn advance(&self, by: Duration) -> Timestamp {
        let next = self.current.get() + by;
        self.current.set(next);
        next
    }

    pub fn advance_hours(&self, hours: i64) -> Timestamp {
        self.advance(Duration::hours(hours))
    }
}

impl DeskClock for FixedClock {
    fn now(&self) -> Timestamp {
        self.current.get()
    }
}
