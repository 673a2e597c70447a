use nalgebra::Vector3;

use crate::error::{Error, Result};

/// Gaze that an ideal tracker would report while the user looks at a known target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedGaze {
    /// unit direction from the eye origin to the target
    pub direction: Vector3<f64>,
    /// distance from the eye origin to the target
    pub vergence: f64,
}

impl ExpectedGaze {
    pub fn toward(origin: &Vector3<f64>, target: &Vector3<f64>) -> Result<Self> {
        let gaze = target - origin;
        let vergence = gaze.norm();
        if vergence <= f64::EPSILON {
            return Err(Error::DegenerateTarget);
        }

        Ok(Self {
            direction: gaze / vergence,
            vergence,
        })
    }
}

/// Difference between an observed gaze and the [`ExpectedGaze`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeError {
    pub direction: Vector3<f64>,
    pub vergence: f64,
    /// device clock minus host clock, in seconds
    pub clock_skew: f64,
}

impl GazeError {
    /// `observed_vergence` must be in meters, like [`ExpectedGaze::vergence`]: a value the
    /// sensor supplied itself is in centimeters and has to be scaled first.
    pub fn between(
        observed_direction: &Vector3<f64>,
        observed_vergence: f64,
        timestamp_device: f64,
        timestamp_host: f64,
        expected: &ExpectedGaze,
    ) -> Self {
        Self {
            direction: observed_direction - expected.direction,
            vergence: observed_vergence - expected.vergence,
            clock_skew: timestamp_device - timestamp_host,
        }
    }

    /// Angle in degrees between observed and expected direction
    pub fn angular_error_deg(&self, expected: &ExpectedGaze) -> f64 {
        let observed = self.direction + expected.direction;
        observed.angle(&expected.direction).to_degrees()
    }
}
