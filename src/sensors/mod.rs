//! Eye-tracker data model: raw DReyeVR sensor events, their normalized samples,
//! and the ways samples enter and leave the crate

pub mod eye_tracker;
pub mod message;
pub mod simulated;
pub mod vector;

pub use eye_tracker::{normalize, normalize_all, EyeTrackerEvent, GazeSample};
pub use vector::SensorVector;
