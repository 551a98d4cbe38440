//! Status-event rendering for the terminal readout.

use velo_geo::WatchError;
use velo_tracker::StatusEvent;

use crate::units::Unit;

/// User-facing text for a stream failure
pub fn status_text(reason: WatchError) -> &'static str {
    match reason {
        WatchError::PermissionDenied => "Permission denied",
        WatchError::SignalUnavailable => "Signal lost",
        WatchError::Timeout => "Waiting for GPS...",
        WatchError::Unsupported => "Geolocation not supported",
        WatchError::Unknown => "Unknown error",
    }
}

/// One readout line per status event
pub fn status_line(event: &StatusEvent, unit: Unit) -> String {
    match event {
        StatusEvent::Active {
            speed, accuracy, ..
        } => {
            format!(
                "GPS Active  {:>4.0} {:<4}  \u{00b1}{:.0} m",
                unit.convert(*speed),
                unit.label(),
                accuracy
            )
        }
        StatusEvent::Error { reason } => status_text(*reason).to_string(),
    }
}
