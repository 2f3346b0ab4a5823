//! Error types for dtc-chart
//!
//! Only catalog loading and configuration can fail. The chart pipeline itself
//! degrades invalid input to sentinel values instead of erroring.

use thiserror::Error;

/// Main error type for the chart crate
#[derive(Error, Debug)]
pub enum ChartError {
    /// Shared configuration or input errors
    #[error(transparent)]
    Common(#[from] dtc_common::Error),

    /// Catalog file could not be read
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog document is not valid JSON of the expected shape
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport failure while fetching a remote catalog
    #[error("Catalog fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Remote catalog replied with a non-success status
    #[error("Catalog fetch from {url} returned HTTP {status}")]
    Status { status: u16, url: String },
}

/// Result type alias using ChartError
pub type Result<T> = std::result::Result<T, ChartError>;
