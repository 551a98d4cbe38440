//! Tracking session controller.
//!
//! Owns the location adapter, the estimator, the update bus and the
//! wake hold. The host delivers notifications on one logical thread
//! through `pump` and the `handle_*` entry points; no locking.

use std::time::Duration;

use velo_geo::{
    Fix, GeoSource, LocationBackend, PermissionState, WatchError, WatchEvent, WatchOptions,
};

use crate::{SpeedEstimator, StatusEvent, UpdateBus, WakeHold, WakePlatform};

/// Page visibility as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Stream configuration handed to the platform watch
    pub watch: WatchOptions,
    /// Exponential low-pass alpha for the speed estimate; `None`
    /// (default) keeps readings unsmoothed
    pub smoothing: Option<f64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            watch: WatchOptions {
                high_accuracy: true,
                timeout: Duration::from_secs(10),
                maximum_age: Duration::ZERO,
            },
            smoothing: None,
        }
    }
}

/// Speed-tracking session over a location backend and a wake platform
pub struct Tracker<B, P> {
    source: GeoSource<B>,
    estimator: SpeedEstimator,
    bus: UpdateBus,
    wake: WakeHold<P>,
    config: TrackerConfig,
    tracking: bool,
}

impl<B: LocationBackend, P: WakePlatform> Tracker<B, P> {
    pub fn new(backend: B, wake_platform: P) -> Self {
        Self::with_config(backend, wake_platform, TrackerConfig::default())
    }

    pub fn with_config(backend: B, wake_platform: P, config: TrackerConfig) -> Self {
        let estimator = match config.smoothing {
            Some(alpha) => SpeedEstimator::with_smoothing(alpha),
            None => SpeedEstimator::new(),
        };

        Self {
            source: GeoSource::new(backend),
            estimator,
            bus: UpdateBus::new(),
            wake: WakeHold::new(wake_platform),
            config,
            tracking: false,
        }
    }

    /// Register a status-event subscriber.
    pub fn subscribe(&mut self, handler: impl FnMut(&StatusEvent) + 'static) {
        self.bus.subscribe(handler);
    }

    /// Best-effort static permission check.
    pub fn query_permission(&self) -> PermissionState {
        self.source.query_permission()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Whether the display hold is currently kept
    pub fn wake_held(&self) -> bool {
        self.wake.is_held()
    }

    /// Most recent speed estimate, m/s
    pub fn last_speed(&self) -> f64 {
        self.estimator.last_speed()
    }

    /// Backend access for hosts that feed the stream themselves
    pub fn backend_mut(&mut self) -> &mut B {
        self.source.backend_mut()
    }

    /// Begin a session, replacing any session already running.
    ///
    /// An unsupported platform surfaces as an `Unsupported` status event
    /// on the next `pump`; the tracker stays idle in that case.
    pub fn start(&mut self) {
        self.stop();
        self.source.start(&self.config.watch);
        if self.source.is_watching() {
            self.tracking = true;
            self.wake.acquire();
        }
    }

    /// End the session; safe when idle. Clears the estimator anchor so
    /// a later session cannot dead-reckon across the gap.
    pub fn stop(&mut self) {
        self.source.stop();
        self.estimator.reset();
        self.wake.release();
        self.tracking = false;
    }

    /// Drain pending adapter notifications, dispatching each one.
    pub fn pump(&mut self) {
        while let Some(event) = self.source.poll() {
            match event {
                WatchEvent::Fix(fix) => self.handle_fix(&fix),
                WatchEvent::Error(reason) => self.handle_error(reason),
            }
        }
    }

    /// Fold one fix into the estimate and publish the reading.
    pub fn handle_fix(&mut self, fix: &Fix) {
        let reading = self.estimator.update(fix);
        self.bus.publish(&StatusEvent::Active {
            speed: reading.speed,
            accuracy: reading.accuracy,
            heading: reading.heading,
            timestamp_ms: reading.timestamp_ms,
        });
    }

    /// Publish a stream failure. Estimator state stays untouched: the
    /// stream remains open and a later fix resumes from the pre-error
    /// anchor.
    pub fn handle_error(&mut self, reason: WatchError) {
        self.bus.publish(&StatusEvent::Error { reason });
    }

    /// Host visibility transition. Foregrounding while tracking
    /// re-acquires the hold platforms revoke on backgrounding.
    pub fn handle_visibility(&mut self, state: VisibilityState) {
        if state == VisibilityState::Visible && self.tracking {
            self.wake.acquire();
        }
    }
}
