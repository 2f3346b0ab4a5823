//! Chart controller
//!
//! Single owner of the chart state: the normalized model, the current style
//! filter and projection, the tap session and the BPM entry. Each handler
//! runs the pipeline to completion and returns the view patch a renderer
//! applies in place.
//!
//! The controller is not shared across threads. Embedders that dispatch
//! input from several threads must serialize calls (for example behind a
//! single `Mutex` or a command queue).

use crate::error::Result;
use crate::highlight::{effective_bpm, parse_bpm_entry};
use crate::loader::load_catalog;
use crate::model::{ChartModel, DanceCatalog};
use crate::normalize::normalize;
use crate::project::{project, ProjectedModel, StyleFilter};
use crate::render::{diff, render, ChartView, ViewPatch};
use crate::tempo::TapSession;
use dtc_common::config::{DataSource, TapConfig, TomlConfig};
use dtc_common::events::{ChartEvent, EventBus, ResetReason, TempoSource};
use dtc_common::time::{self, Clock, MonotonicClock};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Outcome of one tap
#[derive(Debug, Clone, PartialEq)]
pub struct TapUpdate {
    /// Raw tap estimate written into the BPM entry (`0` = not enough taps)
    pub estimate: i32,
    /// View changes caused by the new tempo
    pub patch: ViewPatch,
}

/// Owns chart state and reacts to load, filter and tempo input
pub struct ChartController<C: Clock = MonotonicClock> {
    clock: C,
    model: ChartModel,
    filter: Option<StyleFilter>,
    projected: ProjectedModel,
    session: TapSession,
    bpm_entry: String,
    view: ChartView,
    events: EventBus,
}

impl ChartController<MonotonicClock> {
    /// Controller reading taps from the system monotonic clock
    pub fn new(tap: &TapConfig) -> Self {
        Self::with_clock(tap, MonotonicClock)
    }

    /// Controller from a loaded configuration (validates tap settings)
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        config.tap.validate()?;
        Ok(Self::new(&config.tap))
    }
}

impl<C: Clock> ChartController<C> {
    /// Controller reading taps from `clock`
    pub fn with_clock(tap: &TapConfig, clock: C) -> Self {
        Self {
            clock,
            model: ChartModel::default(),
            filter: None,
            projected: ProjectedModel::default(),
            session: TapSession::from_config(tap),
            bpm_entry: String::new(),
            view: ChartView::default(),
            events: EventBus::default(),
        }
    }

    /// Receive events emitted by future handler calls
    pub fn subscribe(&self) -> broadcast::Receiver<ChartEvent> {
        self.events.subscribe()
    }

    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    pub fn projected(&self) -> &ProjectedModel {
        &self.projected
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    pub fn filter(&self) -> Option<&StyleFilter> {
        self.filter.as_ref()
    }

    pub fn session(&self) -> &TapSession {
        &self.session
    }

    /// Current BPM entry text
    pub fn bpm_entry(&self) -> &str {
        &self.bpm_entry
    }

    /// Entry value after parsing and range normalization
    pub fn effective_bpm(&self) -> i32 {
        effective_bpm(parse_bpm_entry(&self.bpm_entry), self.projected.active_bounds)
    }

    /// Fetch the catalog and load it
    ///
    /// The fetch is the only suspension point; the previous chart stays in
    /// place if it fails.
    pub async fn load_from(&mut self, source: &DataSource) -> Result<&ChartView> {
        let catalog = load_catalog(source).await?;
        Ok(self.load(&catalog))
    }

    /// Replace the chart with a freshly normalized catalog
    ///
    /// All styles start active. Returns the full view to build the tree from.
    pub fn load(&mut self, catalog: &DanceCatalog) -> &ChartView {
        self.model = normalize(&catalog.dances);
        self.filter = None;
        self.projected = project(&self.model, None);
        self.view = render(&self.model, &self.projected, parse_bpm_entry(&self.bpm_entry));

        info!(
            dances = self.model.dances.len(),
            dropped = catalog.dances.len() - self.model.dances.len(),
            styles = self.model.dance_styles.len(),
            subscribers = self.events.subscriber_count(),
            "Chart loaded"
        );

        self.events.emit_lossy(ChartEvent::CatalogLoaded {
            dance_count: self.model.dances.len(),
            style_count: self.model.dance_styles.len(),
            bounds: self.model.bounds,
            timestamp: time::now(),
        });
        self.emit_filter_changed();

        &self.view
    }

    /// Apply a new style filter (`None` = no filter controls, all styles)
    ///
    /// Highlight is recomputed against the new active bounds.
    pub fn set_filter(&mut self, filter: Option<StyleFilter>) -> ViewPatch {
        self.projected = project(&self.model, filter.as_ref());
        self.filter = filter;

        debug!(
            min = self.projected.active_minimum_bpm(),
            max = self.projected.active_maximum_bpm(),
            "Filtered BPM range"
        );

        let patch = self.refresh();
        self.emit_filter_changed();
        patch
    }

    /// Check or uncheck one style toggle
    ///
    /// Unknown styles are ignored.
    pub fn toggle_style(&mut self, style: &str, checked: bool) -> ViewPatch {
        if !self.model.dance_styles.iter().any(|s| s == style) {
            warn!(style, "Ignoring toggle for unknown style");
            return ViewPatch::default();
        }

        let mut filter = StyleFilter::new(self.view.checked_styles());
        filter.set(style, checked);
        self.set_filter(Some(filter))
    }

    /// Record a tap at the clock's current reading
    pub fn tap(&mut self) -> TapUpdate {
        let now = self.clock.now();
        self.tap_at(now)
    }

    /// Record a tap at `now`
    ///
    /// The estimate is written into the BPM entry, then highlighted exactly
    /// as a typed value would be.
    pub fn tap_at(&mut self, now: Instant) -> TapUpdate {
        let reading = self.session.ingest(now);
        if reading.restarted {
            self.events.emit_lossy(ChartEvent::TapSessionReset {
                reason: ResetReason::Cooldown,
                timestamp: time::now(),
            });
        }

        self.bpm_entry = reading.bpm.to_string();
        let patch = self.refresh();
        self.emit_tempo(TempoSource::Tap);

        TapUpdate {
            estimate: reading.bpm,
            patch,
        }
    }

    /// Handle a manual edit of the BPM entry
    pub fn enter_bpm(&mut self, text: &str) -> ViewPatch {
        self.bpm_entry = text.to_string();
        let patch = self.refresh();
        self.emit_tempo(TempoSource::Manual);
        patch
    }

    /// Clear the BPM entry and the tap session
    pub fn reset(&mut self) -> ViewPatch {
        self.bpm_entry.clear();
        self.session.reset();

        self.events.emit_lossy(ChartEvent::TapSessionReset {
            reason: ResetReason::User,
            timestamp: time::now(),
        });

        let patch = self.refresh();
        self.emit_tempo(TempoSource::Manual);
        patch
    }

    fn refresh(&mut self) -> ViewPatch {
        let next = render(&self.model, &self.projected, parse_bpm_entry(&self.bpm_entry));
        let patch = diff(&self.view, &next);
        self.view = next;
        debug!(
            rows = patch.rows.len(),
            toggles = patch.toggles.len(),
            marker_moved = patch.marker.is_some(),
            bpm = self.view.bpm,
            "Chart refreshed"
        );
        patch
    }

    fn emit_filter_changed(&self) {
        self.events.emit_lossy(ChartEvent::FilterChanged {
            active_styles: self.projected.filtered_styles.clone(),
            active_bounds: self.projected.active_bounds,
            visible_count: self.projected.visible_count(),
            timestamp: time::now(),
        });
    }

    fn emit_tempo(&self, source: TempoSource) {
        self.events.emit_lossy(ChartEvent::TempoChanged {
            bpm: self.view.bpm,
            source,
            timestamp: time::now(),
        });
    }
}
