//! Full-pipeline session tests: simulated platform, through the
//! tracker, to the status events subscribers observe.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use velo_geo::{EARTH_RADIUS_M, Fix, SimulatedBackend, WatchError};
use velo_tracker::{
    SimulatedWakePlatform, StatusEvent, Tracker, TrackerConfig, VisibilityState,
};

type TestTracker = Tracker<SimulatedBackend, SimulatedWakePlatform>;

fn tracker_with_log() -> (TestTracker, Rc<RefCell<Vec<StatusEvent>>>) {
    let mut tracker = Tracker::new(SimulatedBackend::new(), SimulatedWakePlatform::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tracker.subscribe(move |event| sink.borrow_mut().push(*event));
    (tracker, log)
}

/// Degrees of latitude spanning `meters` along a meridian
fn lat_offset(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

fn speed_of(event: &StatusEvent) -> f64 {
    match event {
        StatusEvent::Active { speed, .. } => *speed,
        StatusEvent::Error { reason } => panic!("expected an active event, got {reason:?}"),
    }
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

#[test]
fn test_drive_session_end_to_end() {
    let (mut tracker, log) = tracker_with_log();
    tracker.start();

    let base_lat = 40.0;

    // Stationary: two fixes inside the 5 m noise circle
    tracker.backend_mut().push_fix(Fix::new(base_lat, -74.0, 0, 5.0));
    tracker
        .backend_mut()
        .push_fix(Fix::new(base_lat + lat_offset(2.0), -74.0, 5_000, 5.0));

    // Rolling: the device starts reporting speed directly
    tracker
        .backend_mut()
        .push_fix(Fix::new(base_lat + lat_offset(30.0), -74.0, 10_000, 5.0).with_speed(13.4));

    // Reported speed drops out; 100 m over 10 s dead-reckons to 10 m/s
    tracker
        .backend_mut()
        .push_fix(Fix::new(base_lat + lat_offset(130.0), -74.0, 20_000, 5.0));

    tracker.pump();

    let speeds: Vec<f64> = log.borrow().iter().map(speed_of).collect();
    assert_eq!(speeds.len(), 4);
    assert_eq!(speeds[0], 0.0);
    assert_eq!(speeds[1], 0.0);
    assert_eq!(speeds[2], 13.4);
    assert!((speeds[3] - 10.0).abs() < 1e-6);
}

#[test]
fn test_restart_forgets_previous_session() {
    let (mut tracker, log) = tracker_with_log();
    tracker.start();

    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 0, 5.0));
    tracker.pump();

    // Stop, then start again: the old anchor must not survive
    tracker.stop();
    tracker.start();

    tracker
        .backend_mut()
        .push_fix(Fix::new(40.0 + lat_offset(100.0), -74.0, 10_000, 5.0));
    tracker.pump();

    // Without the restart this would dead-reckon to 10 m/s
    let speeds: Vec<f64> = log.borrow().iter().map(speed_of).collect();
    assert_eq!(speeds, vec![0.0, 0.0]);
}

#[test]
fn test_start_twice_keeps_one_stream() {
    let (mut tracker, log) = tracker_with_log();
    tracker.start();
    tracker.start();

    assert_eq!(tracker.backend_mut().active_watches(), 1);

    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 0, 5.0));
    tracker.pump();
    assert_eq!(log.borrow().len(), 1);
}

// ============================================================================
// ERROR RECOVERY
// ============================================================================

#[test]
fn test_timeout_mid_stream_recovers_from_pre_error_anchor() {
    let (mut tracker, log) = tracker_with_log();
    tracker.start();

    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 0, 5.0));
    tracker.backend_mut().push_error(WatchError::Timeout);
    tracker
        .backend_mut()
        .push_fix(Fix::new(40.0 + lat_offset(100.0), -74.0, 10_000, 5.0));
    tracker.pump();

    let log = log.borrow();
    assert_eq!(log.len(), 3);
    assert_eq!(
        log[1],
        StatusEvent::Error {
            reason: WatchError::Timeout
        }
    );
    // The post-error fix still reckons against the fix before the error
    assert!((speed_of(&log[2]) - 10.0).abs() < 1e-6);
}

#[test]
fn test_signal_loss_does_not_end_the_session() {
    let (mut tracker, log) = tracker_with_log();
    tracker.start();

    tracker.backend_mut().push_error(WatchError::SignalUnavailable);
    tracker.pump();

    assert!(tracker.is_tracking());

    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 0, 5.0).with_speed(6.0));
    tracker.pump();

    assert_eq!(speed_of(log.borrow().last().unwrap()), 6.0);
}

// ============================================================================
// WAKE HOLD ACROSS VISIBILITY
// ============================================================================

#[test]
fn test_background_foreground_cycle_keeps_hold_fresh() {
    let (mut tracker, _) = tracker_with_log();
    tracker.start();
    assert!(tracker.wake_held());

    tracker.handle_visibility(VisibilityState::Hidden);
    tracker.handle_visibility(VisibilityState::Visible);
    assert!(tracker.wake_held());

    tracker.stop();
    assert!(!tracker.wake_held());
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_configured_smoothing_carries_across_fixes() {
    let config = TrackerConfig {
        smoothing: Some(0.7),
        ..TrackerConfig::default()
    };
    let mut tracker =
        Tracker::with_config(SimulatedBackend::new(), SimulatedWakePlatform::new(), config);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tracker.subscribe(move |event: &StatusEvent| sink.borrow_mut().push(*event));

    tracker.start();
    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 0, 5.0).with_speed(10.0));
    tracker.backend_mut().push_fix(Fix::new(40.0, -74.0, 1_000, 5.0).with_speed(10.0));
    tracker.pump();

    let speeds: Vec<f64> = log.borrow().iter().map(speed_of).collect();
    assert!((speeds[0] - 7.0).abs() < 1e-9);
    assert!((speeds[1] - 9.1).abs() < 1e-9);
}

#[test]
fn test_default_watch_options_reach_the_platform() {
    let (mut tracker, _) = tracker_with_log();
    tracker.start();

    let options = tracker.backend_mut().last_options().unwrap().clone();
    assert!(options.high_accuracy);
    assert_eq!(options.timeout, Duration::from_secs(10));
    assert_eq!(options.maximum_age, Duration::ZERO);
}
