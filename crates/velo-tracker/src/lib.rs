//! velo Tracker
//!
//! The speed-tracking pipeline: a session controller feeds location
//! fixes through the speed estimator and fans status events out to
//! subscribers, holding the display awake while tracking runs.
//!
//! # Example
//! ```rust,ignore
//! use velo_geo::SimulatedBackend;
//! use velo_tracker::{SimulatedWakePlatform, Tracker};
//!
//! let mut tracker = Tracker::new(SimulatedBackend::new(), SimulatedWakePlatform::new());
//! tracker.subscribe(|event| println!("{:?}", event));
//! tracker.start();
//! tracker.pump();
//! ```

mod broadcast;
mod estimator;
mod event;
mod tracker;
mod wake;

pub use broadcast::UpdateBus;
pub use estimator::{AnchorFix, SpeedEstimator, SpeedReading};
pub use event::StatusEvent;
pub use tracker::{Tracker, TrackerConfig, VisibilityState};
pub use wake::{
    AcquireTicket, SimulatedWakePlatform, WakeError, WakeHold, WakeLockHandle, WakePlatform,
};
