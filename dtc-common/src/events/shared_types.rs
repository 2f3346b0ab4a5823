//! Shared type definitions for event data
//!
//! Common structs used across multiple event types and by the chart engine.

use serde::{Deserialize, Serialize};

/// Inclusive BPM interval
///
/// Bounds are explicit: "no data" is `Option::<BpmBounds>::None`, never a
/// zero-valued range. Values are signed; catalogs may carry negative ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmBounds {
    /// Lowest BPM (inclusive)
    pub min: i32,
    /// Highest BPM (inclusive)
    pub max: i32,
}

impl BpmBounds {
    /// Bounds covering a single range
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Widen to include another range (min seeks lower, max seeks higher)
    pub fn widen(self, min: i32, max: i32) -> Self {
        Self {
            min: self.min.min(min),
            max: self.max.max(max),
        }
    }

    /// Fold an iterator of `(min, max)` pairs into overall bounds
    pub fn enclosing<I>(ranges: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        ranges.into_iter().fold(None, |acc, (min, max)| match acc {
            None => Some(Self::new(min, max)),
            Some(bounds) => Some(bounds.widen(min, max)),
        })
    }

    /// Whether `bpm` lies within the bounds (inclusive both ends)
    pub fn contains(&self, bpm: i32) -> bool {
        bpm >= self.min && bpm <= self.max
    }

    /// Distance between the extremes, `0` when `max < min`
    pub fn span(&self) -> u32 {
        if self.max > self.min {
            self.max.abs_diff(self.min)
        } else {
            0
        }
    }
}
