//! Timestamp utilities
//!
//! Tap timing needs a monotonic source, so the chart reads time through the
//! [`Clock`] trait. Wall-clock stamps ([`now`]) only decorate events.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Monotonic time source
pub trait Clock {
    /// Current monotonic reading
    fn now(&self) -> Instant;
}

/// Clock backed by `Instant::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock for deterministic replay
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<Instant>,
}

impl ManualClock {
    /// Start at the given reading
    pub fn starting_at(start: Instant) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    /// Move forward by `step`
    pub fn advance(&self, step: Duration) {
        self.current.set(self.current.get() + step);
    }

    /// Jump to an absolute reading
    pub fn set(&self, reading: Instant) {
        self.current.set(reading);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Instant::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
