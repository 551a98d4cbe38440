//! Terminal speed display.
//!
//! Drives the tracking pipeline over a scripted location backend and
//! renders one readout line per status event, the way a host shell
//! would consume the stream.

mod render;
mod units;

use std::cell::Cell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use velo_geo::{EARTH_RADIUS_M, Fix, PermissionState, SimulatedBackend, WatchError};
use velo_tracker::{SimulatedWakePlatform, Tracker, VisibilityState};

use crate::units::Unit;

/// Degrees of latitude spanning `meters` along a meridian
fn lat_offset(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut backend = SimulatedBackend::new();
    backend.set_permission(PermissionState::Granted);

    let mut tracker = Tracker::new(backend, SimulatedWakePlatform::new());

    let unit = Rc::new(Cell::new(Unit::Mph));
    let readout_unit = unit.clone();
    tracker.subscribe(move |event| {
        println!("{}", render::status_line(event, readout_unit.get()));
    });

    match tracker.query_permission() {
        PermissionState::Granted => println!("Location permission granted"),
        PermissionState::Denied => println!("Location permission denied"),
        PermissionState::Prompt => println!("Location permission will be requested"),
    }

    tracker.start();

    let base_lat = 40.7128;
    let lon = -74.0060;
    let start_ms: i64 = 1_700_000_000_000;

    // Parked: fixes wander inside the accuracy radius
    tracker.backend_mut().push_fix(Fix::new(base_lat, lon, start_ms, 5.0));
    tracker
        .backend_mut()
        .push_fix(Fix::new(base_lat + lat_offset(2.0), lon, start_ms + 5_000, 5.0));

    // Pulling away: the device reports speed directly
    tracker.backend_mut().push_fix(
        Fix::new(base_lat + lat_offset(40.0), lon, start_ms + 10_000, 5.0)
            .with_speed(8.9)
            .with_heading(0.0),
    );
    tracker.pump();

    // Rider flips the readout to metric
    unit.set(unit.get().toggled());
    println!("-- unit: {} --", unit.get().label());

    // Under a bridge: one fix times out, then the stream recovers and
    // speed falls back to dead reckoning
    tracker.backend_mut().push_error(WatchError::Timeout);
    tracker
        .backend_mut()
        .push_fix(Fix::new(base_lat + lat_offset(140.0), lon, start_ms + 20_000, 5.0));
    tracker.pump();

    // Phone pocketed and pulled back out
    tracker.handle_visibility(VisibilityState::Hidden);
    tracker.handle_visibility(VisibilityState::Visible);
    tracing::info!("wake hold after foreground: {}", tracker.wake_held());

    tracker.stop();

    Ok(())
}
