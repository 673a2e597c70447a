//! Text encoding of a [`GazeSample`] as one line of `key=value` pairs,
//! the format published on the `dreyevr_pub` string topic.
//!
//! ```text
//! rosT=12.5; t_carla=12.5; ... gaze_ray={1,0,0}; ... validity_pupil_posn_r=True;
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use nalgebra::{Vector2, Vector3};

use super::eye_tracker::{CombinedGaze, EyeSample, FocusInfo, GazeSample};
use super::vector::SensorVector;
use crate::error::{Error, Result};

/// focus actor name used when nothing is focused
const NO_FOCUS: &str = "None";

/// Format a sample stamped with the publisher's clock.
///
/// Every pair is followed by `delim`, including the last one.
pub fn format_message(sample: &GazeSample, stamp: f64, delim: &str) -> String {
    let mut msg = String::new();
    let mut put = |key: &str, value: &dyn std::fmt::Display| {
        // writing into a String cannot fail
        let _ = write!(msg, "{}={}{}", key, value, delim);
    };

    let (focus_name, focus_point, focus_dist) = match &sample.focus {
        Some(focus) => (focus.actor_name.as_str(), focus.point, focus.distance),
        None => (NO_FOCUS, Vector3::zeros(), 0.0),
    };

    put("rosT", &stamp);
    put("t_carla", &sample.timestamp_carla);
    put("t_sranipal", &sample.timestamp_sranipal);
    put("t_carla_stream", &sample.timestamp_carla_stream);
    put("sr_frameseq", &sample.frame_sequence);
    put("gaze_ray", &SensorVector::from(sample.combined.gaze_ray));
    put("eye_origin", &SensorVector::from(sample.combined.eye_origin));
    put("vergence", &sample.combined.vergence);
    put("hmd_locn", &SensorVector::from(sample.hmd_location));
    put("hmd_rotn", &SensorVector::from(sample.hmd_rotation));
    put("gaze_ray_l", &SensorVector::from(sample.left.gaze_ray));
    put("eye_origin_l", &SensorVector::from(sample.left.eye_origin));
    put("gaze_ray_r", &SensorVector::from(sample.right.gaze_ray));
    put("eye_origin_r", &SensorVector::from(sample.right.eye_origin));
    put("eye_open_l", &sample.left.openness);
    put("eye_open_r", &sample.right.openness);
    put("pupil_posn_l", &SensorVector::from(sample.left.pupil_position));
    put("pupil_posn_r", &SensorVector::from(sample.right.pupil_position));
    put("pupil_diam_l", &sample.left.pupil_diameter);
    put("pupil_diam_r", &sample.right.pupil_diameter);
    put("focus_actor_name", &focus_name);
    put("focus_actor_pt", &SensorVector::from(focus_point));
    put("focus_actor_dist", &focus_dist);
    put("validity_gaze", &py_bool(sample.combined.gaze_valid));
    put("validity_gaze_l", &py_bool(sample.left.gaze_valid));
    put("validity_gaze_r", &py_bool(sample.right.gaze_valid));
    put("validity_eye_open_l", &py_bool(sample.left.openness_valid));
    put("validity_eye_open_r", &py_bool(sample.right.openness_valid));
    put("validity_pupil_posn_l", &py_bool(sample.left.pupil_position_valid));
    put("validity_pupil_posn_r", &py_bool(sample.right.pupil_position_valid));

    msg
}

fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Parse a line produced by [`format_message`] back into its stamp and sample
pub fn parse_message(line: &str, delim: &str) -> Result<(f64, GazeSample)> {
    let fields = Fields::split(line, delim)?;

    let focus = match fields.get("focus_actor_name")? {
        NO_FOCUS => None,
        name => Some(FocusInfo {
            actor_name: name.to_string(),
            point: fields.vector3("focus_actor_pt")?,
            distance: fields.number("focus_actor_dist")?,
        }),
    };

    let sample = GazeSample {
        timestamp_carla: fields.number("t_carla")?,
        timestamp_sranipal: fields.number("t_sranipal")?,
        timestamp_carla_stream: fields.number("t_carla_stream")?,
        frame_sequence: fields.parse("sr_frameseq")?,
        combined: CombinedGaze {
            gaze_ray: fields.vector3("gaze_ray")?,
            eye_origin: fields.vector3("eye_origin")?,
            vergence: fields.number("vergence")?,
            gaze_valid: fields.boolean("validity_gaze")?,
        },
        left: EyeSample {
            gaze_ray: fields.vector3("gaze_ray_l")?,
            eye_origin: fields.vector3("eye_origin_l")?,
            gaze_valid: fields.boolean("validity_gaze_l")?,
            openness: fields.number("eye_open_l")?,
            openness_valid: fields.boolean("validity_eye_open_l")?,
            pupil_position: fields.vector2("pupil_posn_l")?,
            pupil_position_valid: fields.boolean("validity_pupil_posn_l")?,
            pupil_diameter: fields.number("pupil_diam_l")?,
        },
        right: EyeSample {
            gaze_ray: fields.vector3("gaze_ray_r")?,
            eye_origin: fields.vector3("eye_origin_r")?,
            gaze_valid: fields.boolean("validity_gaze_r")?,
            openness: fields.number("eye_open_r")?,
            openness_valid: fields.boolean("validity_eye_open_r")?,
            pupil_position: fields.vector2("pupil_posn_r")?,
            pupil_position_valid: fields.boolean("validity_pupil_posn_r")?,
            pupil_diameter: fields.number("pupil_diam_r")?,
        },
        hmd_location: fields.vector3("hmd_locn")?,
        hmd_rotation: fields.vector3("hmd_rotn")?,
        focus,
    };

    Ok((fields.number("rosT")?, sample))
}

/// `key=value` pairs of one message
struct Fields<'a>(HashMap<&'a str, &'a str>);

impl<'a> Fields<'a> {
    fn split(line: &'a str, delim: &str) -> Result<Self> {
        let mut pairs = HashMap::new();
        for pair in line.split(delim).map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| Error::Parse {
                field: pair.to_string(),
                reason: "expected key=value".to_string(),
            })?;
            pairs.insert(key.trim(), value.trim());
        }
        Ok(Self(pairs))
    }

    fn get(&self, key: &str) -> Result<&'a str> {
        self.0
            .get(key)
            .copied()
            .ok_or_else(|| Error::MissingField(key.to_string()))
    }

    fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)?.parse().map_err(|e: T::Err| Error::Parse {
            field: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn number(&self, key: &str) -> Result<f64> {
        self.parse(key)
    }

    fn boolean(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            other => Err(Error::Parse {
                field: key.to_string(),
                reason: format!("`{}` is not a boolean", other),
            }),
        }
    }

    fn vector(&self, key: &str) -> Result<SensorVector> {
        let raw = self.get(key)?;
        let inner = raw
            .strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .ok_or_else(|| Error::Parse {
                field: key.to_string(),
                reason: format!("`{}` is not a {{..}} vector", raw),
            })?;

        let components = inner
            .split(',')
            .map(|c| {
                c.trim().parse::<f64>().map_err(|e| Error::Parse {
                    field: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        SensorVector::from_components(&components)
    }

    fn vector2(&self, key: &str) -> Result<Vector2<f64>> {
        self.vector(key)?.into_vector2()
    }

    fn vector3(&self, key: &str) -> Result<Vector3<f64>> {
        self.vector(key)?.into_vector3()
    }
}
