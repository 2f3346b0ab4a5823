//! Tempo event supporting types

use serde::{Deserialize, Serialize};

/// Where a tempo value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TempoSource {
    /// Estimated from tap events
    Tap,
    /// Typed into the BPM entry
    Manual,
}

/// Why the tap session was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ResetReason {
    /// Gap between taps exceeded the cooldown
    Cooldown,
    /// Explicit user reset (escape key or reset action)
    User,
}

impl std::fmt::Display for TempoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TempoSource::Tap => write!(f, "Tap"),
            TempoSource::Manual => write!(f, "Manual"),
        }
    }
}

impl std::fmt::Display for ResetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetReason::Cooldown => write!(f, "Cooldown"),
            ResetReason::User => write!(f, "User"),
        }
    }
}
