//! Location fix model.

use serde::Serialize;

/// One location sample from the positioning subsystem
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// 1-sigma uncertainty radius in meters
    pub accuracy: f64,
    /// Device-reported ground speed in m/s, when the platform knows it
    pub speed: Option<f64>,
    /// Heading in degrees clockwise from north, when known
    pub heading: Option<f64>,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
            accuracy,
            speed: None,
            heading: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }
}
