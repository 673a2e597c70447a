use tracing::{debug, warn};

use crate::{
    algorithms::vergence::VergenceEstimator,
    config::VergenceConfig,
    sensors::eye_tracker::{EyeTrackerEvent, GazeSample},
};

/// Tracking states
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    NoSamplesYet,
    /// last sample carried a valid combined gaze
    Ok,
    /// eyes closed, blink, or the tracker lost the pupils
    Lost,
}

/// Drives the normalization of one sensor's event stream.
///
/// Each update returns a fresh [`GazeSample`], the tracker itself keeps no sample history:
/// retaining samples is up to the caller.
#[derive(Debug, Default)]
pub struct GazeTracker {
    pub tracking_state: TrackingState,
    pub last_tracking_state: TrackingState,
    estimator: VergenceEstimator,
    last_timestamp: Option<f64>,
}

impl GazeTracker {
    pub fn new(config: &VergenceConfig) -> Self {
        Self {
            estimator: VergenceEstimator::new(config),
            ..Default::default()
        }
    }

    /// Normalize `event` and update the tracking state.
    ///
    /// When the sensor did not precompute vergence it is estimated with the configured
    /// estimator; if that is indeterminate the sample carries `NaN`.
    pub fn update(&mut self, event: &EyeTrackerEvent) -> GazeSample {
        if let Some(last) = self.last_timestamp {
            if event.timestamp_carla < last {
                warn!(
                    last,
                    current = event.timestamp_carla,
                    "eye tracker event arrived out of order"
                );
            }
        }
        self.last_timestamp = Some(event.timestamp_carla);

        let sample = GazeSample::from_event_with(event, &self.estimator);

        self.last_tracking_state = self.tracking_state;
        self.tracking_state = if sample.combined.gaze_valid {
            TrackingState::Ok
        } else {
            TrackingState::Lost
        };

        if self.tracking_state != self.last_tracking_state {
            debug!(
                from = ?self.last_tracking_state,
                to = ?self.tracking_state,
                "gaze tracking state changed"
            );
        }

        sample
    }
}
