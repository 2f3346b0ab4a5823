//! Style filtering and proportional axis layout
//!
//! [`project`] is a pure function of its inputs: it restricts the model to
//! the active styles, recomputes the bounds over the visible dances and
//! places each visible dance on a shared BPM axis as fractions of the span.

use crate::model::{ChartModel, Dance, DanceId};
use dtc_common::events::BpmBounds;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Set of styles currently checked in the filter controls
///
/// Passing no filter to [`project`] means "no filter controls present" and
/// shows every style. An empty filter is different: it hides everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFilter {
    active: BTreeSet<String>,
}

impl StyleFilter {
    pub fn new<I, S>(styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: styles.into_iter().map(Into::into).collect(),
        }
    }

    /// Every style of the model checked
    pub fn all(model: &ChartModel) -> Self {
        Self::new(model.dance_styles.iter().cloned())
    }

    /// Nothing checked
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, style: &str) -> bool {
        self.active.contains(style)
    }

    /// Check or uncheck a style
    pub fn set(&mut self, style: &str, checked: bool) {
        if checked {
            self.active.insert(style.to_string());
        } else {
            self.active.remove(style);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active styles, alphabetical
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }
}

/// Horizontal placement of one bar, as fractions of the active BPM span
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BarLayout {
    /// Distance of the bar start from the axis start
    pub offset: f64,
    /// Bar length
    pub width: f64,
}

impl BarLayout {
    /// Place `[min, max]` within `bounds`
    ///
    /// A zero-width span yields the zero layout.
    pub fn within(min: i32, max: i32, bounds: BpmBounds) -> Self {
        let span = bounds.span();
        if span == 0 {
            return Self::default();
        }

        let span = f64::from(span);
        Self {
            offset: (f64::from(min) - f64::from(bounds.min)).max(0.0) / span,
            width: (f64::from(max) - f64::from(min)).max(0.0) / span,
        }
    }

    pub fn offset_percent(&self) -> f64 {
        self.offset * 100.0
    }

    pub fn width_percent(&self) -> f64 {
        self.width * 100.0
    }
}

/// A visible dance with its bar placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedDance {
    pub dance: Dance,
    pub layout: BarLayout,
}

/// Chart model restricted to the active styles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedModel {
    /// Visible dances in model order
    pub dances: Vec<ProjectedDance>,
    pub dance_names: Vec<String>,
    pub dance_styles: Vec<String>,
    /// Style set actually applied, alphabetical
    pub filtered_styles: Vec<String>,
    /// Bounds over the visible dances; `None` when nothing is visible
    pub active_bounds: Option<BpmBounds>,
}

impl ProjectedModel {
    /// Active minimum, `0` when undefined
    pub fn active_minimum_bpm(&self) -> i32 {
        self.active_bounds.map(|b| b.min).unwrap_or(0)
    }

    /// Active maximum, `0` when undefined
    pub fn active_maximum_bpm(&self) -> i32 {
        self.active_bounds.map(|b| b.max).unwrap_or(0)
    }

    pub fn visible_count(&self) -> usize {
        self.dances.len()
    }

    /// Layout of a visible dance, `None` when hidden
    pub fn layout_of(&self, id: DanceId) -> Option<BarLayout> {
        // Visible dances keep model order, so ids are ascending
        self.dances
            .binary_search_by_key(&id, |projected| projected.dance.id)
            .ok()
            .map(|index| self.dances[index].layout)
    }

    pub fn is_visible(&self, id: DanceId) -> bool {
        self.layout_of(id).is_some()
    }
}

/// Restrict `model` to the styles in `filter` and lay out the visible dances
pub fn project(model: &ChartModel, filter: Option<&StyleFilter>) -> ProjectedModel {
    let filtered_styles: Vec<String> = match filter {
        None => model.dance_styles.clone(),
        Some(filter) => filter.styles().map(str::to_string).collect(),
    };
    let active: BTreeSet<&str> = filtered_styles.iter().map(String::as_str).collect();

    let visible: Vec<&Dance> = model
        .dances
        .iter()
        .filter(|dance| active.contains(dance.style.as_str()))
        .collect();

    let active_bounds = BpmBounds::enclosing(visible.iter().map(|d| (d.min, d.max)));

    if let Some(bounds) = active_bounds {
        if bounds.span() == 0 {
            warn!(
                bpm = bounds.min,
                visible = visible.len(),
                "Active BPM span is zero, bars collapse to the axis start"
            );
        }
    }

    let dances = visible
        .into_iter()
        .map(|dance| ProjectedDance {
            layout: active_bounds
                .map(|bounds| BarLayout::within(dance.min, dance.max, bounds))
                .unwrap_or_default(),
            dance: dance.clone(),
        })
        .collect::<Vec<_>>();

    debug!(
        styles = ?filtered_styles,
        visible = dances.len(),
        ?active_bounds,
        "Projected chart"
    );

    ProjectedModel {
        dances,
        dance_names: model.dance_names.clone(),
        dance_styles: model.dance_styles.clone(),
        filtered_styles,
        active_bounds,
    }
}
