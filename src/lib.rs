//! Gaze processing for the DReyeVR eye-tracking sensor.
//!
//! Raw sensor events ([`EyeTrackerEvent`]) are normalized into immutable [`GazeSample`]s
//! in the host simulator convention (meters, y axis flipped), and binocular vergence is
//! estimated from the closest approach of the two gaze rays.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod sensors;
pub mod tracker;

pub use algorithms::vergence::{calc_vergence_from_dir, VergenceEstimator};
pub use config::GazeConfig;
pub use error::{Error, Result};
pub use sensors::{normalize, normalize_all, EyeTrackerEvent, GazeSample, SensorVector};
pub use tracker::{GazeTracker, TrackingState};
