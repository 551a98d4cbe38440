//! Status events delivered to the presentation layer.

use serde::Serialize;
use velo_geo::WatchError;

/// One update published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusEvent {
    /// Tracking is live; speed in m/s, accuracy in meters
    Active {
        speed: f64,
        accuracy: f64,
        heading: Option<f64>,
        timestamp_ms: i64,
    },
    /// The stream reported a failure; session state is untouched
    Error { reason: WatchError },
}
