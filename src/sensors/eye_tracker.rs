use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::vector::{flip_y, to_host_frame};
use crate::algorithms::vergence::VergenceEstimator;

/// One raw measurement delivered by the DReyeVR sensor callback.
///
/// Values are in the device frame: positions in centimeters, directions as unit vectors.
/// Each vector field carries the dimensionality the sensor declares for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeTrackerEvent {
    /// host simulator time, seconds
    pub timestamp_carla: f64,
    /// eye-tracker device time, seconds
    pub timestamp_sranipal: f64,
    /// time the sample entered the simulator stream, seconds
    pub timestamp_carla_stream: f64,
    #[serde(default)]
    pub frame_sequence: i64,

    pub gaze_ray: Vector3<f64>,
    pub eye_origin: Vector3<f64>,
    pub gaze_valid: bool,
    /// precomputed by the sensor (centimeters), if it did so
    #[serde(default)]
    pub vergence: Option<f64>,

    pub hmd_location: Vector3<f64>,
    /// Euler angles in degrees
    pub hmd_rotation: Vector3<f64>,

    pub gaze_ray_left: Vector3<f64>,
    pub eye_origin_left: Vector3<f64>,
    pub gaze_valid_left: bool,
    pub gaze_ray_right: Vector3<f64>,
    pub eye_origin_right: Vector3<f64>,
    pub gaze_valid_right: bool,

    pub eye_openness_left: f64,
    pub eye_openness_valid_left: bool,
    pub eye_openness_right: f64,
    pub eye_openness_valid_right: bool,

    pub pupil_posn_left: Vector2<f64>,
    pub pupil_posn_valid_left: bool,
    pub pupil_posn_right: Vector2<f64>,
    pub pupil_posn_valid_right: bool,

    /// millimeters
    pub pupil_diam_left: f64,
    pub pupil_diam_right: f64,

    #[serde(default)]
    pub focus_actor_name: Option<String>,
    #[serde(default)]
    pub focus_actor_point: Vector3<f64>,
    #[serde(default)]
    pub focus_actor_distance: f64,
}

/// Combined (cyclopean) gaze of both eyes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedGaze {
    pub gaze_ray: Vector3<f64>,
    pub eye_origin: Vector3<f64>,
    /// Depth of the fixation point. Passed through as-is (centimeters) when the
    /// sensor precomputed it, otherwise estimated in meters, `NaN` when indeterminate.
    pub vergence: f64,
    pub gaze_valid: bool,
}

/// State of a single eye
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeSample {
    pub gaze_ray: Vector3<f64>,
    pub eye_origin: Vector3<f64>,
    pub gaze_valid: bool,
    pub openness: f64,
    pub openness_valid: bool,
    pub pupil_position: Vector2<f64>,
    pub pupil_position_valid: bool,
    pub pupil_diameter: f64,
}

/// Actor hit by the gaze ray in the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusInfo {
    pub actor_name: String,
    pub point: Vector3<f64>,
    pub distance: f64,
}

/// Snapshot of eye-tracking state, in the host simulator convention
/// (meters, y axis flipped). Built once per event and never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub timestamp_carla: f64,
    pub timestamp_sranipal: f64,
    pub timestamp_carla_stream: f64,
    pub frame_sequence: i64,

    pub combined: CombinedGaze,
    pub left: EyeSample,
    pub right: EyeSample,

    pub hmd_location: Vector3<f64>,
    pub hmd_rotation: Vector3<f64>,

    pub focus: Option<FocusInfo>,
}

impl GazeSample {
    pub fn from_event(event: &EyeTrackerEvent) -> Self {
        Self::from_event_with(event, &VergenceEstimator::default())
    }

    /// Like [`GazeSample::from_event`], estimating missing vergence with `estimator`.
    /// An indeterminate estimate is stored as `NaN`.
    pub fn from_event_with(event: &EyeTrackerEvent, estimator: &VergenceEstimator) -> Self {
        // vergence is measured between the raw device-frame rays
        let vergence = event.vergence.unwrap_or_else(|| {
            estimator
                .estimate(
                    &event.eye_origin_left,
                    &event.eye_origin_right,
                    &event.gaze_ray_left,
                    &event.gaze_ray_right,
                )
                .unwrap_or(f64::NAN)
        });

        Self {
            timestamp_carla: event.timestamp_carla,
            timestamp_sranipal: event.timestamp_sranipal,
            timestamp_carla_stream: event.timestamp_carla_stream,
            frame_sequence: event.frame_sequence,
            combined: CombinedGaze {
                gaze_ray: event.gaze_ray,
                eye_origin: to_host_frame(&event.eye_origin),
                vergence,
                gaze_valid: event.gaze_valid,
            },
            left: EyeSample {
                gaze_ray: flip_y(&event.gaze_ray_left),
                eye_origin: to_host_frame(&event.eye_origin_left),
                gaze_valid: event.gaze_valid_left,
                openness: event.eye_openness_left,
                openness_valid: event.eye_openness_valid_left,
                pupil_position: event.pupil_posn_left,
                pupil_position_valid: event.pupil_posn_valid_left,
                pupil_diameter: event.pupil_diam_left,
            },
            right: EyeSample {
                gaze_ray: flip_y(&event.gaze_ray_right),
                eye_origin: to_host_frame(&event.eye_origin_right),
                gaze_valid: event.gaze_valid_right,
                openness: event.eye_openness_right,
                openness_valid: event.eye_openness_valid_right,
                pupil_position: event.pupil_posn_right,
                pupil_position_valid: event.pupil_posn_valid_right,
                pupil_diameter: event.pupil_diam_right,
            },
            hmd_location: to_host_frame(&event.hmd_location),
            hmd_rotation: event.hmd_rotation,
            focus: event.focus_actor_name.as_ref().map(|name| FocusInfo {
                actor_name: name.clone(),
                point: to_host_frame(&event.focus_actor_point),
                distance: event.focus_actor_distance,
            }),
        }
    }
}

impl From<&EyeTrackerEvent> for GazeSample {
    fn from(event: &EyeTrackerEvent) -> Self {
        Self::from_event(event)
    }
}

/// Normalize a raw sensor event into a [`GazeSample`]
pub fn normalize(event: &EyeTrackerEvent) -> GazeSample {
    GazeSample::from_event(event)
}

/// Normalize every event in order, each independently of the others
pub fn normalize_all<'a, I>(events: I) -> Vec<GazeSample>
where
    I: IntoIterator<Item = &'a EyeTrackerEvent>,
{
    events.into_iter().map(GazeSample::from_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn event() -> EyeTrackerEvent {
        EyeTrackerEvent {
            timestamp_carla: 12.5,
            timestamp_sranipal: 12.49,
            timestamp_carla_stream: 12.51,
            frame_sequence: 7,
            gaze_ray: Vector3::new(1.0, 0.0, 0.0),
            eye_origin: Vector3::new(10.0, 20.0, 30.0),
            gaze_valid: true,
            vergence: Some(250.0),
            hmd_location: Vector3::new(150.0, -40.0, 120.0),
            hmd_rotation: Vector3::new(5.0, -10.0, 90.0),
            gaze_ray_left: Vector3::new(0.6, 0.8, 0.0),
            eye_origin_left: Vector3::new(-6.308, 3.247, 1.264),
            gaze_valid_left: true,
            gaze_ray_right: Vector3::new(0.6, -0.8, 0.0),
            eye_origin_right: Vector3::new(-5.284, -3.269, 1.014),
            gaze_valid_right: false,
            eye_openness_left: 0.9,
            eye_openness_valid_left: true,
            eye_openness_right: 0.2,
            eye_openness_valid_right: false,
            pupil_posn_left: Vector2::new(0.4, 0.6),
            pupil_posn_valid_left: true,
            pupil_posn_right: Vector2::new(-0.1, 0.3),
            pupil_posn_valid_right: true,
            pupil_diam_left: 3.1,
            pupil_diam_right: 3.3,
            focus_actor_name: None,
            focus_actor_point: Vector3::zeros(),
            focus_actor_distance: 0.0,
        }
    }

    #[test]
    fn eye_origin_is_converted_to_meters_with_y_flipped() {
        let sample = GazeSample::from_event(&event());
        assert_eq!(sample.combined.eye_origin, Vector3::new(0.1, -0.2, 0.3));
        assert_eq!(sample.hmd_location, Vector3::new(1.5, 0.4, 1.2));
    }

    #[test]
    fn pupil_position_stays_planar_and_unscaled() {
        let sample = GazeSample::from_event(&event());
        assert_eq!(sample.left.pupil_position, Vector2::new(0.4, 0.6));
        assert_eq!(sample.right.pupil_position, Vector2::new(-0.1, 0.3));
    }

    #[test]
    fn directions_are_flipped_but_not_scaled() {
        let sample = GazeSample::from_event(&event());
        assert_eq!(sample.combined.gaze_ray, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(sample.left.gaze_ray, Vector3::new(0.6, -0.8, 0.0));
        assert_eq!(sample.right.gaze_ray, Vector3::new(0.6, 0.8, 0.0));
        assert_eq!(sample.hmd_rotation, Vector3::new(5.0, -10.0, 90.0));
    }

    #[test]
    fn scalars_and_flags_pass_through() {
        let sample = GazeSample::from_event(&event());
        assert_eq!(sample.timestamp_carla, 12.5);
        assert_eq!(sample.timestamp_sranipal, 12.49);
        assert_eq!(sample.timestamp_carla_stream, 12.51);
        assert_eq!(sample.frame_sequence, 7);
        assert_eq!(sample.combined.vergence, 250.0);
        assert!(sample.combined.gaze_valid);
        assert!(sample.left.gaze_valid && !sample.right.gaze_valid);
        assert_eq!(sample.left.openness, 0.9);
        assert!(!sample.right.openness_valid);
        assert_eq!(sample.right.pupil_diameter, 3.3);
        assert_eq!(sample.focus, None);
    }

    #[test]
    fn missing_vergence_is_computed_from_the_eye_rays() {
        let mut raw = event();
        raw.vergence = None;
        let target = Vector3::new(300.0, 0.0, 0.0);
        raw.gaze_ray_left = (target - raw.eye_origin_left).normalize();
        raw.gaze_ray_right = (target - raw.eye_origin_right).normalize();

        let sample = GazeSample::from_event(&raw);

        let origin_mid = (raw.eye_origin_left + raw.eye_origin_right) / 2.0;
        assert_relative_eq!(
            sample.combined.vergence,
            (target - origin_mid).norm() / 100.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn focus_point_is_converted_like_other_positions() {
        let mut raw = event();
        raw.focus_actor_name = Some("vehicle.tesla.model3".to_string());
        raw.focus_actor_point = Vector3::new(500.0, 100.0, 0.0);
        raw.focus_actor_distance = 5.1;

        let focus = GazeSample::from_event(&raw).focus.unwrap();
        assert_eq!(focus.actor_name, "vehicle.tesla.model3");
        assert_eq!(focus.point, Vector3::new(5.0, -1.0, 0.0));
        assert_eq!(focus.distance, 5.1);
    }

    #[test]
    fn strict_estimator_leaves_parallel_vergence_undefined() {
        let mut raw = event();
        raw.vergence = None;
        raw.gaze_ray_left = Vector3::new(1.0, 0.0, 0.0);
        raw.gaze_ray_right = Vector3::new(1.0, 0.0, 0.0);

        let strict = VergenceEstimator::new(&crate::config::VergenceConfig::strict());
        assert!(GazeSample::from_event_with(&raw, &strict)
            .combined
            .vergence
            .is_nan());
        assert_eq!(GazeSample::from_event(&raw).combined.vergence, 1.0);
    }

    #[test]
    fn records_survive_a_toml_round_trip() {
        let mut raw = event();
        raw.focus_actor_name = Some("walker.pedestrian.0001".to_string());
        raw.focus_actor_point = Vector3::new(420.0, -35.5, 12.0);
        raw.focus_actor_distance = 4.2;

        let text = toml::to_string(&raw).unwrap();
        let parsed: EyeTrackerEvent = toml::from_str(&text).unwrap();
        assert_eq!(parsed, raw);

        let sample = GazeSample::from_event(&raw);
        let text = toml::to_string(&sample).unwrap();
        let parsed: GazeSample = toml::from_str(&text).unwrap();
        assert_eq!(parsed, sample);
    }

    #[test]
    fn optional_sensor_fields_may_be_omitted() {
        let mut text = toml::to_string(&event()).unwrap();
        text = text
            .lines()
            .filter(|line| {
                !["frame_sequence", "vergence", "focus_actor_point", "focus_actor_distance"]
                    .iter()
                    .any(|key| line.starts_with(key))
            })
            .collect::<Vec<_>>()
            .join("\n");

        let parsed: EyeTrackerEvent = toml::from_str(&text).unwrap();
        assert_eq!(parsed.frame_sequence, 0);
        assert_eq!(parsed.vergence, None);
        assert_eq!(parsed.focus_actor_name, None);
        assert_eq!(parsed.timestamp_carla, 12.5);
    }

    #[test]
    fn normalizing_twice_does_not_compound_the_conversion() {
        let raw = event();
        let first = normalize(&raw);
        let second = normalize(&raw);
        assert_eq!(first, second);
        assert_eq!(second.combined.eye_origin, Vector3::new(0.1, -0.2, 0.3));
    }
}
