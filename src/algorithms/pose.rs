use nalgebra::{Rotation3, Vector3};

use crate::sensors::eye_tracker::GazeSample;

/// Rotation of the HMD from its reported Euler angles in degrees.
///
/// The angles are applied as extrinsic rotations about `y`, then `x`, then `z`,
/// the same convention as UE4 FRotators: `R = Rz(a2) * Rx(a1) * Ry(a0)`
pub fn hmd_rotation_matrix(angles_deg: &Vector3<f64>) -> Rotation3<f64> {
    let about_y = Rotation3::from_axis_angle(&Vector3::y_axis(), angles_deg.x.to_radians());
    let about_x = Rotation3::from_axis_angle(&Vector3::x_axis(), angles_deg.y.to_radians());
    let about_z = Rotation3::from_axis_angle(&Vector3::z_axis(), angles_deg.z.to_radians());

    about_z * about_x * about_y
}

/// Eye origins of the combined, left and right eye in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldEyeOrigins {
    pub combined: Vector3<f64>,
    pub left: Vector3<f64>,
    pub right: Vector3<f64>,
}

/// HMD pose (location in meters, rotation) anchoring the eye tracker's frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub location: Vector3<f64>,
    pub rotation: Rotation3<f64>,
}

impl HeadPose {
    pub fn new(location: Vector3<f64>, angles_deg: &Vector3<f64>) -> Self {
        Self {
            location,
            rotation: hmd_rotation_matrix(angles_deg),
        }
    }

    pub fn from_sample(sample: &GazeSample) -> Self {
        Self::new(sample.hmd_location, &sample.hmd_rotation)
    }

    /// Transform a point given relative to the HMD into world space
    pub fn world_origin(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.location + self.rotation * local
    }

    pub fn eye_origins_world(&self, sample: &GazeSample) -> WorldEyeOrigins {
        WorldEyeOrigins {
            combined: self.world_origin(&sample.combined.eye_origin),
            left: self.world_origin(&sample.left.eye_origin),
            right: self.world_origin(&sample.right.eye_origin),
        }
    }
}
