//! BPM highlighting
//!
//! A tempo of `0` means "no tempo": every dance stays highlighted. Tempos
//! outside the active bounds are normalized to `0` rather than rejected.

use crate::model::Dance;
use dtc_common::events::BpmBounds;

/// Normalize a raw tempo against the active bounds
///
/// Returns `0` when `bpm` is outside `[min, max]` or no bounds exist.
pub fn effective_bpm(bpm: i32, active_bounds: Option<BpmBounds>) -> i32 {
    match active_bounds {
        Some(bounds) if bounds.contains(bpm) => bpm,
        _ => 0,
    }
}

/// In-range flag per dance, in input order
pub fn apply_highlight<'a, I>(bpm: i32, active_bounds: Option<BpmBounds>, dances: I) -> Vec<bool>
where
    I: IntoIterator<Item = &'a Dance>,
{
    let bpm = effective_bpm(bpm, active_bounds);
    dances
        .into_iter()
        .map(|dance| bpm == 0 || dance.contains_bpm(bpm))
        .collect()
}

/// Position of the tempo marker as a fraction of the active span
///
/// `None` when there is no effective tempo to mark.
pub fn marker_position(bpm: i32, active_bounds: Option<BpmBounds>) -> Option<f64> {
    let bpm = effective_bpm(bpm, active_bounds);
    let bounds = active_bounds?;
    if bpm == 0 {
        return None;
    }
    if bounds.span() == 0 {
        return Some(0.0);
    }
    Some((f64::from(bpm) - f64::from(bounds.min)) / f64::from(bounds.span()))
}

/// Parse the BPM text entry
///
/// Reads a leading integer the way a lenient form field would: leading
/// whitespace is skipped, an optional sign is accepted and anything after the
/// digits is ignored. Non-numeric entries read as `0`; values outside `i32`
/// saturate.
pub fn parse_bpm_entry(text: &str) -> i32 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        value = -value;
    }
    i32::try_from(value).unwrap_or(if negative { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DanceId;

    fn dance(id: usize, min: i32, max: i32) -> Dance {
        Dance {
            id: DanceId(id),
            name: format!("Dance {}", id),
            style: "Style".to_string(),
            timing: None,
            min,
            max,
            source: None,
        }
    }

    fn dances() -> Vec<Dance> {
        vec![dance(0, 80, 90), dance(1, 85, 100), dance(2, 100, 120)]
    }

    #[test]
    fn test_zero_bpm_highlights_everything() {
        let flags = apply_highlight(0, Some(BpmBounds::new(80, 120)), &dances());
        assert_eq!(flags, vec![true, true, true]);
    }

    #[test]
    fn test_out_of_bounds_bpm_is_ignored() {
        let bounds = Some(BpmBounds::new(80, 120));
        assert_eq!(apply_highlight(200, bounds, &dances()), vec![true, true, true]);
        assert_eq!(apply_highlight(79, bounds, &dances()), vec![true, true, true]);
    }

    #[test]
    fn test_inclusive_range_membership() {
        let bounds = Some(BpmBounds::new(80, 120));
        assert_eq!(apply_highlight(90, bounds, &dances()), vec![true, true, false]);
        assert_eq!(apply_highlight(100, bounds, &dances()), vec![false, true, true]);
        assert_eq!(apply_highlight(110, bounds, &dances()), vec![false, false, true]);
    }

    #[test]
    fn test_no_bounds_means_no_tempo() {
        assert_eq!(effective_bpm(100, None), 0);
        assert_eq!(apply_highlight(100, None, &dances()), vec![true, true, true]);
    }

    #[test]
    fn test_marker_position() {
        let bounds = Some(BpmBounds::new(80, 120));
        assert_eq!(marker_position(100, bounds), Some(0.5));
        assert_eq!(marker_position(0, bounds), None);
        assert_eq!(marker_position(150, bounds), None);
        assert_eq!(marker_position(120, Some(BpmBounds::new(120, 120))), Some(0.0));
    }

    #[test]
    fn test_parse_bpm_entry() {
        assert_eq!(parse_bpm_entry("120"), 120);
        assert_eq!(parse_bpm_entry("  96 "), 96);
        assert_eq!(parse_bpm_entry("+88"), 88);
        assert_eq!(parse_bpm_entry("128bpm"), 128);
        assert_eq!(parse_bpm_entry("101.7"), 101);
        assert_eq!(parse_bpm_entry(""), 0);
        assert_eq!(parse_bpm_entry("fast"), 0);
        assert_eq!(parse_bpm_entry("-90"), -90);
        assert_eq!(parse_bpm_entry("-"), 0);
        assert_eq!(parse_bpm_entry("99999999999"), i32::MAX);
        assert_eq!(parse_bpm_entry("-99999999999"), i32::MIN);
    }

    #[test]
    fn test_negative_tempo_within_negative_bounds() {
        let bounds = Some(BpmBounds::new(-20, 80));
        let dances = vec![dance(0, -20, 20), dance(1, 60, 80)];

        assert_eq!(effective_bpm(-90, Some(BpmBounds::new(80, 120))), 0);
        assert_eq!(apply_highlight(-10, bounds, &dances), vec![true, false]);
        assert_eq!(marker_position(-20, bounds), Some(0.0));
        assert_eq!(marker_position(30, bounds), Some(0.5));
    }
}
