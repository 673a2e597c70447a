use std::fmt;

use nalgebra::{Vector2, Vector3};

use crate::error::{Error, Result};

/// Sensor units (centimeters) per host simulator unit (meters)
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// A vector as the eye tracker declares it: planar (pupil positions on the image plane)
/// or spatial (rays, origins, poses)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorVector {
    Vector2(Vector2<f64>),
    Vector3(Vector3<f64>),
}

impl SensorVector {
    /// Builds the variant matching the number of components
    pub fn from_components(components: &[f64]) -> Result<Self> {
        match *components {
            [x, y] => Ok(Self::Vector2(Vector2::new(x, y))),
            [x, y, z] => Ok(Self::Vector3(Vector3::new(x, y, z))),
            _ => Err(Error::Dimension {
                expected: 3,
                actual: components.len(),
            }),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Self::Vector2(_) => 2,
            Self::Vector3(_) => 3,
        }
    }

    pub fn components(&self) -> &[f64] {
        match self {
            Self::Vector2(v) => v.as_slice(),
            Self::Vector3(v) => v.as_slice(),
        }
    }

    pub fn into_vector2(self) -> Result<Vector2<f64>> {
        match self {
            Self::Vector2(v) => Ok(v),
            Self::Vector3(_) => Err(Error::Dimension {
                expected: 2,
                actual: 3,
            }),
        }
    }

    pub fn into_vector3(self) -> Result<Vector3<f64>> {
        match self {
            Self::Vector3(v) => Ok(v),
            Self::Vector2(_) => Err(Error::Dimension {
                expected: 3,
                actual: 2,
            }),
        }
    }
}

impl From<Vector2<f64>> for SensorVector {
    fn from(v: Vector2<f64>) -> Self {
        Self::Vector2(v)
    }
}

impl From<Vector3<f64>> for SensorVector {
    fn from(v: Vector3<f64>) -> Self {
        Self::Vector3(v)
    }
}

/// Renders as `{x,y}` or `{x,y,z}`
impl fmt::Display for SensorVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.components().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "}}")
    }
}

/// Convert a point from the device frame (centimeters) into the host simulator frame:
/// meters, with the y axis flipped.
pub fn to_host_frame(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, -v.y, v.z) / CENTIMETERS_PER_METER
}

/// Flip the y axis of a direction, without any scaling
pub fn flip_y(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, -v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_follows_component_count() {
        let planar = SensorVector::from_components(&[0.4, 0.6]).unwrap();
        assert_eq!(planar, SensorVector::Vector2(Vector2::new(0.4, 0.6)));
        assert_eq!(planar.dimension(), 2);

        let spatial = SensorVector::from_components(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(spatial.components(), &[1.0, 2.0, 3.0]);

        assert!(matches!(
            SensorVector::from_components(&[1.0]),
            Err(Error::Dimension { actual: 1, .. })
        ));
        assert!(SensorVector::from_components(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn planar_vector_is_not_spatial() {
        let planar = SensorVector::from(Vector2::new(0.4, 0.6));
        assert!(planar.into_vector3().is_err());
        assert_eq!(planar.into_vector2().unwrap(), Vector2::new(0.4, 0.6));
    }

    #[test]
    fn display_lists_components() {
        assert_eq!(SensorVector::from(Vector2::new(0.4, 0.6)).to_string(), "{0.4,0.6}");
        assert_eq!(
            SensorVector::from(Vector3::new(1.0, -2.5, 0.0)).to_string(),
            "{1,-2.5,0}"
        );
    }

    #[test]
    fn host_frame_scales_and_flips_y() {
        let host = to_host_frame(&Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(host, Vector3::new(0.1, -0.2, 0.3));
    }
}
