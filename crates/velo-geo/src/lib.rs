//! velo Geolocation Layer
//!
//! Location fixes, spherical-earth distance, and the platform
//! location-source seam feeding the tracker pipeline.

mod distance;
mod fix;
mod source;

pub use distance::{EARTH_RADIUS_M, haversine_m};
pub use fix::Fix;
pub use source::{GeoSource, LocationBackend, SimulatedBackend};

use std::time::Duration;

use serde::Serialize;

/// Permission state reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// Identifier of an active watch subscription
pub type WatchId = u64;

/// Configuration for a continuous fix stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Per-fix wait bound; exceeding it surfaces `WatchError::Timeout`.
    pub timeout: Duration,
    /// Oldest cached fix the platform may hand back.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Stream failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum WatchError {
    #[error("User denied location permission")]
    PermissionDenied,

    #[error("Position signal unavailable")]
    SignalUnavailable,

    #[error("Timed out waiting for a fix")]
    Timeout,

    #[error("Platform has no location capability")]
    Unsupported,

    #[error("Unknown location error")]
    Unknown,
}

/// One notification from an active fix stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchEvent {
    Fix(Fix),
    Error(WatchError),
}
