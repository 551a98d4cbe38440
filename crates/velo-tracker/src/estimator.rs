//! Speed estimation from successive location fixes.
//!
//! Device-reported speed wins when present and nonzero. Otherwise the
//! estimator dead-reckons between the previous and current fix, gated
//! by the current fix's accuracy radius: while stationary, successive
//! fixes differ only by GPS noise bounded by that radius, and the gate
//! keeps the noise from reading as movement.

use velo_geo::{Fix, haversine_m};

/// Snapshot of the fix most recently folded into the estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorFix {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: i64,
    pub accuracy: f64,
}

/// One speed estimate produced from a fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedReading {
    /// Estimated speed in m/s
    pub speed: f64,
    /// Accuracy radius of the underlying fix, in meters
    pub accuracy: f64,
    pub heading: Option<f64>,
    pub timestamp_ms: i64,
}

/// Converts raw fixes into speed estimates
#[derive(Debug, Default)]
pub struct SpeedEstimator {
    last_fix: Option<AnchorFix>,
    last_speed: f64,
    smoothing: Option<f64>,
}

impl SpeedEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with an exponential low-pass over successive readings;
    /// `alpha` is the weight of the newest sample. The unsmoothed
    /// default trades stability for responsiveness.
    pub fn with_smoothing(alpha: f64) -> Self {
        Self {
            smoothing: Some(alpha),
            ..Self::default()
        }
    }

    /// Most recent estimate, m/s
    pub fn last_speed(&self) -> f64 {
        self.last_speed
    }

    /// Anchor retained for dead reckoning, if a fix has been seen
    pub fn last_fix(&self) -> Option<AnchorFix> {
        self.last_fix
    }

    /// Fold one fix into the estimate.
    ///
    /// Never fails: a fix that supports neither a reported speed nor a
    /// plausible fallback yields zero.
    pub fn update(&mut self, fix: &Fix) -> SpeedReading {
        let mut final_speed = match fix.speed {
            // A real reported speed wins outright
            Some(speed) if speed != 0.0 => speed,
            _ => self.fallback_speed(fix),
        };

        if let Some(alpha) = self.smoothing {
            final_speed = alpha * final_speed + (1.0 - alpha) * self.last_speed;
        }

        self.last_speed = final_speed;
        // Overwritten whole, never merged; speed and heading are not
        // retained beyond this reading
        self.last_fix = Some(AnchorFix {
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp_ms: fix.timestamp_ms,
            accuracy: fix.accuracy,
        });

        SpeedReading {
            speed: final_speed,
            accuracy: fix.accuracy,
            heading: fix.heading,
            timestamp_ms: fix.timestamp_ms,
        }
    }

    /// Dead reckoning against the previous fix. Displacement must beat
    /// the accuracy radius and time must move forward, else stationary.
    fn fallback_speed(&self, fix: &Fix) -> f64 {
        let Some(prev) = self.last_fix else {
            return 0.0;
        };

        let dist = haversine_m(prev.latitude, prev.longitude, fix.latitude, fix.longitude);
        let elapsed = (fix.timestamp_ms - prev.timestamp_ms) as f64 / 1000.0;

        if elapsed > 0.0 && dist > fix.accuracy {
            dist / elapsed
        } else {
            0.0
        }
    }

    /// Forget the session; the next fix cannot dead-reckon.
    pub fn reset(&mut self) {
        self.last_fix = None;
        self.last_speed = 0.0;
    }
}
