//! Declarative chart view and row patches
//!
//! [`render`] maps the current model, projection and tempo to plain row
//! descriptors. A renderer builds its tree once from a [`ChartView`] and then
//! applies the [`ViewPatch`] produced by [`diff`] instead of rebuilding.

use crate::highlight::{apply_highlight, effective_bpm, marker_position};
use crate::model::{ChartModel, Dance, DanceId};
use crate::project::{BarLayout, ProjectedModel};
use dtc_common::events::BpmBounds;
use serde::Serialize;

/// Per-row data a renderer attaches to both bar and detail rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowMetadata {
    pub id: DanceId,
    pub name: String,
    pub style: String,
    pub timing: Option<String>,
    pub min: i32,
    pub max: i32,
}

impl From<&Dance> for RowMetadata {
    fn from(dance: &Dance) -> Self {
        Self {
            id: dance.id,
            name: dance.name.clone(),
            style: dance.style.clone(),
            timing: dance.timing.clone(),
            min: dance.min,
            max: dance.max,
        }
    }
}

/// One proportional bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    pub meta: RowMetadata,
    /// Text drawn inside the bar
    pub label: String,
    /// Hover text
    pub title: String,
    pub visible: bool,
    /// Placement on the axis, `None` while hidden
    pub layout: Option<BarLayout>,
    pub in_range: bool,
}

/// One line of the detail list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub meta: RowMetadata,
    pub line: String,
    /// Citation link
    pub source: Option<String>,
    pub visible: bool,
    pub in_range: bool,
}

/// One style checkbox of the filter group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterToggle {
    pub style: String,
    pub checked: bool,
}

/// Everything a renderer needs to draw the chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartView {
    pub toggles: Vec<FilterToggle>,
    pub bars: Vec<BarRow>,
    pub details: Vec<DetailRow>,
    pub active_bounds: Option<BpmBounds>,
    /// Tempo after range normalization, `0` for none
    pub bpm: i32,
    /// Tempo marker as a fraction of the active span
    pub marker: Option<f64>,
}

impl ChartView {
    pub fn visible_bars(&self) -> impl Iterator<Item = &BarRow> {
        self.bars.iter().filter(|bar| bar.visible)
    }

    pub fn bar(&self, id: DanceId) -> Option<&BarRow> {
        self.bars.get(id.0).filter(|bar| bar.meta.id == id)
    }

    /// Styles whose toggle is checked
    pub fn checked_styles(&self) -> impl Iterator<Item = &str> {
        self.toggles
            .iter()
            .filter(|toggle| toggle.checked)
            .map(|toggle| toggle.style.as_str())
    }
}

/// Change to apply to one row in both the bar and the detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPatch {
    pub id: DanceId,
    pub visible: bool,
    pub layout: Option<BarLayout>,
    pub in_range: bool,
}

/// New tempo readout, marker and axis bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerPatch {
    pub bpm: i32,
    pub marker: Option<f64>,
    pub active_bounds: Option<BpmBounds>,
}

/// Everything a renderer must update to go from one view to the next
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewPatch {
    pub rows: Vec<RowPatch>,
    /// Toggles whose checked state changed
    pub toggles: Vec<FilterToggle>,
    /// Present when the tempo, the marker or the active bounds changed
    pub marker: Option<MarkerPatch>,
}

impl ViewPatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.toggles.is_empty() && self.marker.is_none()
    }
}

/// Build the full view
///
/// Every model dance gets a bar and a detail row; rows outside the
/// projection are marked hidden. Highlight covers hidden rows too.
pub fn render(model: &ChartModel, projected: &ProjectedModel, bpm: i32) -> ChartView {
    let active_bounds = projected.active_bounds;
    let in_range = apply_highlight(bpm, active_bounds, &model.dances);

    let toggles = model
        .dance_styles
        .iter()
        .map(|style| FilterToggle {
            style: style.clone(),
            checked: projected.filtered_styles.contains(style),
        })
        .collect();

    let mut bars = Vec::with_capacity(model.dances.len());
    let mut details = Vec::with_capacity(model.dances.len());
    for (dance, in_range) in model.dances.iter().zip(in_range) {
        let layout = projected.layout_of(dance.id);
        let visible = layout.is_some();
        let description = dance.describe();

        bars.push(BarRow {
            meta: RowMetadata::from(dance),
            label: dance.name.clone(),
            title: description.clone(),
            visible,
            layout,
            in_range,
        });
        details.push(DetailRow {
            meta: RowMetadata::from(dance),
            line: description,
            source: dance.source.clone(),
            visible,
            in_range,
        });
    }

    ChartView {
        toggles,
        bars,
        details,
        active_bounds,
        bpm: effective_bpm(bpm, active_bounds),
        marker: marker_position(bpm, active_bounds),
    }
}

/// Changes between two views
///
/// Views over different models (a reload) patch every row and toggle of
/// `next`.
pub fn diff(previous: &ChartView, next: &ChartView) -> ViewPatch {
    ViewPatch {
        rows: diff_rows(previous, next),
        toggles: diff_toggles(previous, next),
        marker: diff_marker(previous, next),
    }
}

fn diff_rows(previous: &ChartView, next: &ChartView) -> Vec<RowPatch> {
    let same_rows = previous.bars.len() == next.bars.len()
        && previous
            .bars
            .iter()
            .zip(&next.bars)
            .all(|(old, new)| old.meta == new.meta);

    next.bars
        .iter()
        .enumerate()
        .filter(|(index, new)| {
            if !same_rows {
                return true;
            }
            let old = &previous.bars[*index];
            old.visible != new.visible || old.layout != new.layout || old.in_range != new.in_range
        })
        .map(|(_, new)| RowPatch {
            id: new.meta.id,
            visible: new.visible,
            layout: new.layout,
            in_range: new.in_range,
        })
        .collect()
}

fn diff_toggles(previous: &ChartView, next: &ChartView) -> Vec<FilterToggle> {
    let same_styles = previous.toggles.len() == next.toggles.len()
        && previous
            .toggles
            .iter()
            .zip(&next.toggles)
            .all(|(old, new)| old.style == new.style);

    if !same_styles {
        return next.toggles.clone();
    }
    previous
        .toggles
        .iter()
        .zip(&next.toggles)
        .filter(|(old, new)| old.checked != new.checked)
        .map(|(_, new)| new.clone())
        .collect()
}

fn diff_marker(previous: &ChartView, next: &ChartView) -> Option<MarkerPatch> {
    let unchanged = previous.bpm == next.bpm
        && previous.marker == next.marker
        && previous.active_bounds == next.active_bounds;
    if unchanged {
        return None;
    }
    Some(MarkerPatch {
        bpm: next.bpm,
        marker: next.marker,
        active_bounds: next.active_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DanceRecord;
    use crate::normalize::normalize;
    use crate::project::{project, StyleFilter};

    fn model() -> ChartModel {
        normalize(&vec![
            DanceRecord {
                name: "Jive".to_string(),
                style: "Latin".to_string(),
                min: Some(168),
                max: Some(176),
                source: Some("https://example.com/jive".to_string()),
                ..Default::default()
            },
            DanceRecord {
                name: "Waltz".to_string(),
                style: "Standard".to_string(),
                timing: Some("3/4".to_string()),
                min: Some(84),
                max: Some(90),
                ..Default::default()
            },
            DanceRecord {
                name: "Hustle".to_string(),
                min: Some(110),
                max: Some(120),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_render_labels_and_metadata() {
        let model = model();
        let view = render(&model, &project(&model, None), 0);

        assert_eq!(view.bars.len(), 3);
        assert_eq!(view.details.len(), 3);

        let waltz = &view.bars[0];
        assert_eq!(waltz.label, "Waltz");
        assert_eq!(waltz.title, "Waltz (Standard) - 84-90bpm");
        assert_eq!(waltz.meta.timing.as_deref(), Some("3/4"));

        assert_eq!(view.details[1].line, "Hustle - 110-120bpm");
        assert_eq!(view.details[2].source.as_deref(), Some("https://example.com/jive"));
        assert!(view.details[1].source.is_none());
    }

    #[test]
    fn test_toggles_follow_filter() {
        let model = model();
        let view = render(&model, &project(&model, Some(&StyleFilter::new(["Latin"]))), 0);

        let toggles: Vec<(&str, bool)> = view
            .toggles
            .iter()
            .map(|t| (t.style.as_str(), t.checked))
            .collect();
        assert_eq!(toggles, vec![("", false), ("Latin", true), ("Standard", false)]);
        assert_eq!(view.checked_styles().collect::<Vec<_>>(), vec!["Latin"]);
        assert_eq!(view.visible_bars().count(), 1);
        assert!(view.bars[0].layout.is_none());
    }

    #[test]
    fn test_marker_and_effective_bpm() {
        let model = model();
        let projected = project(&model, None);

        let view = render(&model, &projected, 130);
        assert_eq!(view.bpm, 130);
        assert!(view.marker.is_some());
        assert_eq!(
            view.bars.iter().map(|b| b.in_range).collect::<Vec<_>>(),
            vec![false, false, false]
        );

        let out_of_bounds = render(&model, &projected, 300);
        assert_eq!(out_of_bounds.bpm, 0);
        assert!(out_of_bounds.marker.is_none());
        assert!(out_of_bounds.bars.iter().all(|b| b.in_range));
    }

    #[test]
    fn test_diff_reports_only_changed_rows() {
        let model = model();
        let before = render(&model, &project(&model, None), 0);
        let after = render(&model, &project(&model, None), 88);

        let patch = diff(&before, &after);
        // Waltz stays in range, the other two drop out
        let ids: Vec<DanceId> = patch.rows.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![DanceId(1), DanceId(2)]);
        assert!(patch.rows.iter().all(|p| !p.in_range && p.visible));
        assert!(patch.toggles.is_empty());

        assert!(diff(&after, &after).is_empty());
    }

    #[test]
    fn test_diff_reports_marker_move_without_row_changes() {
        let model = model();
        let projected = project(&model, None);
        // 115 and 118 both highlight only Hustle
        let before = render(&model, &projected, 115);
        let after = render(&model, &projected, 118);

        let patch = diff(&before, &after);
        assert!(patch.rows.is_empty());
        let marker = patch.marker.unwrap();
        assert_eq!(marker.bpm, 118);
        assert_eq!(marker.marker, after.marker);
        assert_eq!(marker.active_bounds, after.active_bounds);
    }

    #[test]
    fn test_diff_reports_changed_toggles() {
        let model = model();
        let before = render(&model, &project(&model, None), 0);
        let after = render(&model, &project(&model, Some(&StyleFilter::new(["Latin"]))), 0);

        let patch = diff(&before, &after);
        let toggles: Vec<(&str, bool)> = patch
            .toggles
            .iter()
            .map(|t| (t.style.as_str(), t.checked))
            .collect();
        assert_eq!(toggles, vec![("", false), ("Standard", false)]);
        // Bounds shrink to the Latin rows, so the axis is patched too
        assert_eq!(patch.marker.unwrap().active_bounds, Some(BpmBounds::new(168, 176)));
    }

    #[test]
    fn test_diff_against_empty_view_patches_everything() {
        let model = model();
        let view = render(&model, &project(&model, None), 0);
        let patch = diff(&ChartView::default(), &view);
        assert_eq!(patch.rows.len(), 3);
        assert_eq!(patch.toggles.len(), 3);
        assert!(patch.marker.is_some());
    }
}
