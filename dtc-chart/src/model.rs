//! Catalog input records and the normalized chart model

use dtc_common::events::BpmBounds;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Catalog document as fetched: `{ "dances": [ ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanceCatalog {
    #[serde(default)]
    pub dances: Vec<DanceRecord>,
}

/// One raw catalog entry
///
/// `min`/`max` accept any JSON value; integers that fit in `i32` are kept
/// with their sign, anything else reads as absent so the record is dropped
/// during normalization rather than failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanceRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default, deserialize_with = "lenient_bpm")]
    pub min: Option<i32>,
    #[serde(default, deserialize_with = "lenient_bpm")]
    pub max: Option<i32>,
    #[serde(default)]
    pub source: Option<String>,
}

impl DanceRecord {
    /// Both bounds present and non-zero
    pub fn bpm_range(&self) -> Option<(i32, i32)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min != 0 && max != 0 => Some((min, max)),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.bpm_range().is_some()
    }
}

fn lenient_bpm<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_i64())
        .and_then(|n| i32::try_from(n).ok()))
}

/// Position of a dance in the sorted chart model
///
/// Stable for the lifetime of one model; a reload assigns fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DanceId(pub usize);

impl fmt::Display for DanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated dance with a known BPM range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dance {
    pub id: DanceId,
    pub name: String,
    pub style: String,
    pub timing: Option<String>,
    pub min: i32,
    pub max: i32,
    pub source: Option<String>,
}

impl Dance {
    /// `bpm` within this dance's range, inclusive both ends
    pub fn contains_bpm(&self, bpm: i32) -> bool {
        bpm >= self.min && bpm <= self.max
    }

    /// Human-readable summary: `"Name (Style) - 80-90bpm"`
    ///
    /// The style part is omitted for dances without a style.
    pub fn describe(&self) -> String {
        let mut line = self.name.clone();
        if !self.style.is_empty() {
            line.push_str(&format!(" ({})", self.style));
        }
        line.push_str(&format!(" - {}-{}bpm", self.min, self.max));
        line
    }
}

/// Normalized catalog
///
/// Rebuilt wholesale on every load, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartModel {
    /// Valid dances sorted by `(min, max)`, input order kept on ties
    pub dances: Vec<Dance>,
    /// Distinct dance names, alphabetical
    pub dance_names: Vec<String>,
    /// Distinct styles, alphabetical
    pub dance_styles: Vec<String>,
    /// Global bounds; `None` when no valid dance exists
    pub bounds: Option<BpmBounds>,
}

impl ChartModel {
    pub fn is_empty(&self) -> bool {
        self.dances.is_empty()
    }

    pub fn dance(&self, id: DanceId) -> Option<&Dance> {
        self.dances.get(id.0)
    }

    /// Global minimum, `0` when undefined
    pub fn minimum_bpm(&self) -> i32 {
        self.bounds.map(|b| b.min).unwrap_or(0)
    }

    /// Global maximum, `0` when undefined
    pub fn maximum_bpm(&self) -> i32 {
        self.bounds.map(|b| b.max).unwrap_or(0)
    }
}
