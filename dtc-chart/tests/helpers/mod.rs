//! Shared test helpers

pub mod log_capture;
