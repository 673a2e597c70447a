use nalgebra::Vector3;
use tracing::debug;

use super::triangulation::closest_approach;
use crate::config::VergenceConfig;
use crate::sensors::vector::CENTIMETERS_PER_METER;

/// Value returned by [`calc_vergence_from_dir`] when the gaze rays are parallel
pub const PARALLEL_FALLBACK: f64 = 1.0;

const PARALLEL_EPSILON: f64 = 1e-8;

/// Estimates binocular vergence, the depth at which the left and right gaze rays converge.
///
/// Origins are in sensor units (centimeters), the result is in meters: the distance
/// from the midpoint of both eye origins to the middle of the shortest segment joining the rays.
///
/// Parallel rays never converge, so the fixed [`PARALLEL_FALLBACK`] is returned for them,
/// except when both rays start at the same origin, which yields `0`.
pub fn calc_vergence_from_dir(
    l0: &Vector3<f64>,
    r0: &Vector3<f64>,
    l_dir: &Vector3<f64>,
    r_dir: &Vector3<f64>,
) -> f64 {
    VergenceEstimator::default()
        .estimate(l0, r0, l_dir, r_dir)
        .unwrap_or(PARALLEL_FALLBACK)
}

/// Configurable version of [`calc_vergence_from_dir`]
#[derive(Debug, Clone, PartialEq)]
pub struct VergenceEstimator {
    parallel_epsilon: f64,
    parallel_fallback: Option<f64>,
    units_per_meter: f64,
}

impl Default for VergenceEstimator {
    fn default() -> Self {
        Self {
            parallel_epsilon: PARALLEL_EPSILON,
            parallel_fallback: Some(PARALLEL_FALLBACK),
            units_per_meter: CENTIMETERS_PER_METER,
        }
    }
}

impl From<&VergenceConfig> for VergenceEstimator {
    fn from(config: &VergenceConfig) -> Self {
        Self {
            parallel_epsilon: config.parallel_epsilon,
            parallel_fallback: (!config.strict).then_some(config.parallel_fallback),
            units_per_meter: config.units_per_meter,
        }
    }
}

impl VergenceEstimator {
    pub fn new(config: &VergenceConfig) -> Self {
        Self::from(config)
    }

    /// Vergence distance in meters, or `None` when the rays are parallel
    /// and no fallback value is configured.
    pub fn estimate(
        &self,
        l0: &Vector3<f64>,
        r0: &Vector3<f64>,
        l_dir: &Vector3<f64>,
        r_dir: &Vector3<f64>,
    ) -> Option<f64> {
        // midpoint between the two eye origins
        let origin_mid = (l0 + r0) / 2.0;

        match closest_approach(l0, r0, l_dir, r_dir, self.parallel_epsilon) {
            Some(approach) => {
                Some((approach.midpoint() - origin_mid).norm() / self.units_per_meter)
            }
            // both rays start at the same point and overlap entirely
            None if l0 == r0 => Some(0.0),
            None => {
                debug!(
                    fallback = ?self.parallel_fallback,
                    "gaze rays are parallel, vergence is indeterminate"
                );
                self.parallel_fallback
            }
        }
    }
}
