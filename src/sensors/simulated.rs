use nalgebra::{Vector2, Vector3};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::eye_tracker::EyeTrackerEvent;
use crate::error::{Error, Result};

/// Eye origins the SRanipal runtime reports before calibration, in centimeters
/// relative to the HMD: combined, left, right.
pub static DEFAULT_EYE_ORIGINS: Lazy<[Vector3<f64>; 3]> = Lazy::new(|| {
    [
        Vector3::new(-5.60, 0.14, 1.12),
        Vector3::new(-6.308, 3.247, 1.264),
        Vector3::new(-5.284, -3.269, 1.014),
    ]
});

/// device clock trails the simulator clock by this much, seconds
const DEVICE_LATENCY: f64 = 0.005;

/// Deterministic stand-in for the DReyeVR sensor.
///
/// Every call to [`SimulatedEyeTracker::fixate`] produces the next event of a stream
/// where both eyes look at a target, with gaussian noise added to the gaze directions.
pub struct SimulatedEyeTracker {
    rng: StdRng,
    noise: Normal<f64>,
    period: f64,
    time: f64,
    frame_sequence: i64,
}

impl SimulatedEyeTracker {
    /// `period` is the time between events in seconds,
    /// `noise_sigma` the standard deviation added to each direction component.
    pub fn new(seed: u64, period: f64, noise_sigma: f64) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::Config(format!(
                "event period must be positive, got {}",
                period
            )));
        }
        if !(noise_sigma.is_finite() && noise_sigma >= 0.0) {
            return Err(Error::Config(format!(
                "gaze noise must be non-negative, got {}",
                noise_sigma
            )));
        }

        let noise = Normal::new(0.0, noise_sigma)
            .map_err(|e| Error::Config(format!("invalid gaze noise: {}", e)))?;

        Ok(Self {
            // use reproducible random numbers so runs can be compared
            rng: StdRng::seed_from_u64(seed),
            noise,
            period,
            time: 0.0,
            frame_sequence: 0,
        })
    }

    fn noisy_direction(&mut self, origin: &Vector3<f64>, target: &Vector3<f64>) -> Vector3<f64> {
        let jitter = Vector3::new(
            self.noise.sample(&mut self.rng),
            self.noise.sample(&mut self.rng),
            self.noise.sample(&mut self.rng),
        );
        ((target - origin).normalize() + jitter).normalize()
    }

    /// Next event with both eyes fixating `target` (centimeters, device frame)
    pub fn fixate(&mut self, target: &Vector3<f64>) -> EyeTrackerEvent {
        self.time += self.period;
        self.frame_sequence += 1;

        let [combined, left, right] = *DEFAULT_EYE_ORIGINS;

        EyeTrackerEvent {
            timestamp_carla: self.time,
            timestamp_sranipal: self.time - DEVICE_LATENCY,
            timestamp_carla_stream: self.time,
            frame_sequence: self.frame_sequence,
            gaze_ray: self.noisy_direction(&combined, target),
            eye_origin: combined,
            gaze_valid: true,
            vergence: None,
            gaze_ray_left: self.noisy_direction(&left, target),
            eye_origin_left: left,
            gaze_valid_left: true,
            gaze_ray_right: self.noisy_direction(&right, target),
            eye_origin_right: right,
            gaze_valid_right: true,
            eye_openness_left: 1.0,
            eye_openness_valid_left: true,
            eye_openness_right: 1.0,
            eye_openness_valid_right: true,
            pupil_posn_left: Vector2::new(0.5, 0.5),
            pupil_posn_valid_left: true,
            pupil_posn_right: Vector2::new(0.5, 0.5),
            pupil_posn_valid_right: true,
            pupil_diam_left: 3.5,
            pupil_diam_right: 3.5,
            ..Default::default()
        }
    }
}
