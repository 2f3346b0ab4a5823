//! # Dance Tempo Chart Common Library
//!
//! Shared code for the dance tempo chart crates including:
//! - Error types
//! - Configuration loading (TOML bootstrap with graceful defaults)
//! - Logging initialisation
//! - Monotonic clock abstraction
//! - Chart event types and the broadcast EventBus

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
