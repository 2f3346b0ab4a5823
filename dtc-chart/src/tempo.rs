//! Tap tempo tracking
//!
//! Keeps a bounded window of tap timestamps and estimates BPM from the mean
//! interval between consecutive taps. A gap longer than the cooldown starts a
//! fresh session.

use dtc_common::config::{TapConfig, DEFAULT_TAP_COOLDOWN_MS, DEFAULT_TAP_HISTORY};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

const NANOS_PER_MINUTE: u128 = 60_000_000_000;

/// Result of ingesting one tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapReading {
    /// Estimated BPM, `0` while fewer than two taps are held
    pub bpm: i32,
    /// The tap arrived after the cooldown and restarted the session
    pub restarted: bool,
}

/// Sliding window of tap timestamps
#[derive(Debug, Clone)]
pub struct TapSession {
    events: VecDeque<Instant>,
    cooldown: Duration,
    max_events: usize,
}

impl TapSession {
    /// Session with the given cooldown and history cap
    ///
    /// A cap below 2 is raised to 2 so an estimate stays possible.
    pub fn new(cooldown: Duration, max_events: usize) -> Self {
        let max_events = max_events.max(2);
        Self {
            events: VecDeque::with_capacity(max_events + 1),
            cooldown,
            max_events,
        }
    }

    pub fn from_config(config: &TapConfig) -> Self {
        Self::new(config.cooldown(), config.max_events)
    }

    /// Record a tap at `now` and return the updated estimate
    pub fn ingest_tap(&mut self, now: Instant) -> i32 {
        self.ingest(now).bpm
    }

    /// Record a tap at `now`, reporting whether the session restarted
    pub fn ingest(&mut self, now: Instant) -> TapReading {
        let mut restarted = false;
        if let Some(&last) = self.events.back() {
            let gap = now.saturating_duration_since(last);
            if gap > self.cooldown {
                debug!(gap_ms = gap.as_millis() as u64, "Tap cooldown elapsed, starting new session");
                self.events.clear();
                restarted = true;
            }
        }

        self.events.push_back(now);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }

        let bpm = self.estimate();
        debug!(taps = self.events.len(), bpm, "Tap ingested");
        TapReading { bpm, restarted }
    }

    /// `floor(60000 / mean interval in ms)`, or `0` with fewer than two taps
    ///
    /// The mean of consecutive intervals equals the first-to-last span
    /// divided by the interval count, computed here in integer nanoseconds.
    pub fn estimate(&self) -> i32 {
        let (Some(first), Some(last)) = (self.events.front(), self.events.back()) else {
            return 0;
        };
        let intervals = self.events.len().saturating_sub(1) as u128;
        if intervals == 0 {
            return 0;
        }

        let total = last.saturating_duration_since(*first).as_nanos();
        if total == 0 {
            return 0;
        }

        let bpm = NANOS_PER_MINUTE * intervals / total;
        i32::try_from(bpm).unwrap_or(i32::MAX)
    }

    /// Forget all taps
    pub fn reset(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Held tap timestamps, oldest first
    pub fn events(&self) -> impl Iterator<Item = &Instant> {
        self.events.iter()
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }
}

impl Default for TapSession {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TAP_COOLDOWN_MS), DEFAULT_TAP_HISTORY)
    }
}
