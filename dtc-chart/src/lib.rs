//! dtc-chart - dance tempo chart engine
//!
//! Turns a catalog of dances with BPM ranges into a proportional bar chart
//! over a shared BPM axis, filters it by dance style and highlights the
//! dances matching a tapped or typed tempo.
//!
//! Pipeline: [`normalize`] (catalog → [`ChartModel`]) → [`project`]
//! (model + style filter → [`ProjectedModel`]) → [`render`] (declarative
//! rows) → [`diff`] (view patch for an in-place renderer). The
//! [`ChartController`] owns the state and runs the pipeline per input event.

pub mod controller;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod project;
pub mod render;
pub mod tempo;

pub use controller::{ChartController, TapUpdate};
pub use error::{ChartError, Result};
pub use highlight::{apply_highlight, effective_bpm, marker_position, parse_bpm_entry};
pub use model::{ChartModel, Dance, DanceCatalog, DanceId, DanceRecord};
pub use normalize::normalize;
pub use project::{project, BarLayout, ProjectedDance, ProjectedModel, StyleFilter};
pub use render::{
    diff, render, BarRow, ChartView, DetailRow, FilterToggle, MarkerPatch, RowMetadata, RowPatch,
    ViewPatch,
};
pub use tempo::{TapReading, TapSession};
