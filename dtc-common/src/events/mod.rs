//! Event types for the chart event system
//!
//! Provides the chart event definitions and an EventBus that renderers and
//! other observers subscribe to.

mod shared_types;
mod tempo_types;

pub use shared_types::BpmBounds;
pub use tempo_types::{ResetReason, TempoSource};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Chart event types
///
/// Emitted by the chart controller after each handler finishes. Events can be
/// serialized for transmission to an out-of-process renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChartEvent {
    /// A catalog was normalized and replaced the current chart model
    CatalogLoaded {
        /// Number of valid dances kept
        dance_count: usize,
        /// Number of distinct styles
        style_count: usize,
        /// Global BPM bounds (None for an empty catalog)
        bounds: Option<BpmBounds>,
        /// When the catalog was loaded
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Active style filter changed and the projection was recomputed
    FilterChanged {
        /// Styles currently shown, alphabetical
        active_styles: Vec<String>,
        /// Bounds over the visible dances only
        active_bounds: Option<BpmBounds>,
        /// Number of visible dances
        visible_count: usize,
        /// When the filter changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Effective tempo changed (0 = no tempo, nothing filtered out)
    TempoChanged {
        /// Effective BPM after range normalization
        bpm: i32,
        /// Tap estimate or manual entry
        source: TempoSource,
        /// When the tempo changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Tap session cleared
    TapSessionReset {
        /// Cooldown expiry or explicit reset
        reason: ResetReason,
        /// When the session was cleared
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast bus for chart events
pub struct EventBus {
    tx: broadcast::Sender<ChartEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before lagging receivers drop old events
    ///
    /// # Examples
    ///
    /// ```
    /// use dtc_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(64);
    /// let _rx = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ChartEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ChartEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
