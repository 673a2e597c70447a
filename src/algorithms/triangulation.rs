use nalgebra::Vector3;

/// Shortest segment connecting two rays, see [`closest_approach`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    /// scale of the left direction reaching `point_left`
    pub mu_left: f64,
    /// scale of the right direction reaching `point_right`
    pub mu_right: f64,
    pub point_left: Vector3<f64>,
    pub point_right: Vector3<f64>,
}

impl ClosestApproach {
    /// Middle of the shortest segment, the midpoint triangulation of both rays
    pub fn midpoint(&self) -> Vector3<f64> {
        (self.point_left + self.point_right) / 2.0
    }

    /// Length of the shortest segment, `0` when the rays truly intersect
    pub fn separation(&self) -> f64 {
        (self.point_left - self.point_right).norm()
    }
}

/// Finds the shortest line segment joining the lines `l0 + mu_l * l_dir` and `r0 + mu_r * r_dir`.
/// Implementation follows http://paulbourke.net/geometry/pointlineplane/
///
/// Returns `None` when the directions are parallel within `epsilon`,
/// since the perpendicularity conditions have no unique solution there.
pub fn closest_approach(
    l0: &Vector3<f64>,
    r0: &Vector3<f64>,
    l_dir: &Vector3<f64>,
    r_dir: &Vector3<f64>,
    epsilon: f64,
) -> Option<ClosestApproach> {
    // segment between the two origins
    let l0r0 = l0 - r0;

    // dot-product terms of the perpendicular shortest segment
    let d1343 = l0r0.dot(r_dir);
    let d4321 = r_dir.dot(l_dir);
    let d1321 = l0r0.dot(l_dir);
    let d4343 = r_dir.dot(r_dir);
    let d2121 = l_dir.dot(l_dir);

    let denom = d2121 * d4343 - d4321 * d4321;
    if denom.abs() < epsilon {
        return None;
    }
    let numer = d1343 * d4321 - d1321 * d4343;

    let mu_left = numer / denom;
    let mu_right = (d1343 + d4321 * mu_left) / d4343;

    Some(ClosestApproach {
        mu_left,
        mu_right,
        point_left: l0 + l_dir * mu_left,
        point_right: r0 + r_dir * mu_right,
    })
}
