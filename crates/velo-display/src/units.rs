//! Display units for the speed readout.
//!
//! The pipeline reports m/s; conversion is a display concern.

/// Meters per second to miles per hour
pub const MPS_TO_MPH: f64 = 2.23694;

/// Meters per second to kilometers per hour
pub const MPS_TO_KMH: f64 = 3.6;

/// Speed readout unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Mph,
    Kmh,
}

impl Unit {
    pub fn convert(self, mps: f64) -> f64 {
        match self {
            Unit::Mph => mps * MPS_TO_MPH,
            Unit::Kmh => mps * MPS_TO_KMH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Mph => "mph",
            Unit::Kmh => "km/h",
        }
    }

    pub fn toggled(self) -> Unit {
        match self {
            Unit::Mph => Unit::Kmh,
            Unit::Kmh => Unit::Mph,
        }
    }
}
