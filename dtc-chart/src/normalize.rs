//! Catalog normalization
//!
//! Drops records without a usable BPM range, sorts the rest by `(min, max)`
//! and builds the alphabetical name/style indexes and the global bounds.

use crate::model::{ChartModel, Dance, DanceId, DanceRecord};
use dtc_common::events::BpmBounds;
use std::collections::BTreeSet;
use tracing::debug;

/// Build a fresh [`ChartModel`] from raw records
///
/// Invalid records (missing or zero `min`/`max`) are skipped silently.
/// Sorting is stable: dances with equal `(min, max)` keep their input order.
pub fn normalize<'a, I>(records: I) -> ChartModel
where
    I: IntoIterator<Item = &'a DanceRecord>,
{
    let mut names = BTreeSet::new();
    let mut styles = BTreeSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        let Some((min, max)) = record.bpm_range() else {
            dropped += 1;
            continue;
        };

        names.insert(record.name.clone());
        styles.insert(record.style.clone());
        kept.push((record, min, max));
    }

    // Vec::sort_by_key is stable
    kept.sort_by_key(|&(_, min, max)| (min, max));

    let bounds = BpmBounds::enclosing(kept.iter().map(|&(_, min, max)| (min, max)));

    let dances: Vec<Dance> = kept
        .into_iter()
        .enumerate()
        .map(|(index, (record, min, max))| Dance {
            id: DanceId(index),
            name: record.name.clone(),
            style: record.style.clone(),
            timing: record.timing.clone(),
            min,
            max,
            source: record.source.clone(),
        })
        .collect();

    debug!(
        kept = dances.len(),
        dropped,
        styles = styles.len(),
        ?bounds,
        "Normalized dance catalog"
    );

    ChartModel {
        dances,
        dance_names: names.into_iter().collect(),
        dance_styles: styles.into_iter().collect(),
        bounds,
    }
}
