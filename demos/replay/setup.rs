use serde::Deserialize;

use wayfinder::prelude::{
    AttitudeEvent, Capabilities, Config, Duration, Epoch, Fix, Route, Waypoint,
};

fn default_frame_rate_hz() -> f64 {
    10.0
}

/// Recorded walk, timestamps expressed in seconds since session start.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub cfg: Config,
    #[serde(default)]
    pub capabilities: Capabilities,
    pub route: Vec<Waypoint>,
    #[serde(default)]
    pub fixes: Vec<RecordedFix>,
    #[serde(default)]
    pub attitude: Vec<RecordedHeading>,
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: f64,
    #[serde(default)]
    pub validation: Validation,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecordedFix {
    pub t: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecordedHeading {
    pub t: f64,
    pub heading: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Validation {
    #[serde(default)]
    pub expect_arrival: bool,
}

impl Scenario {
    pub fn route(&self) -> Route {
        Route::new(self.route.clone()).unwrap_or_else(|e| panic!("invalid scenario route: {}", e))
    }

    pub fn fix(&self, t0: Epoch, index: usize) -> Option<Fix> {
        let recorded = self.fixes.get(index)?;
        let fix = Fix::new(
            t0 + Duration::from_seconds(recorded.t),
            recorded.latitude,
            recorded.longitude,
        );
        Some(match recorded.accuracy_m {
            Some(accuracy_m) => fix.with_accuracy_m(accuracy_m),
            None => fix,
        })
    }

    pub fn attitude(&self, t0: Epoch, index: usize) -> Option<AttitudeEvent> {
        let recorded = self.attitude.get(index)?;
        Some(AttitudeEvent::compass(
            t0 + Duration::from_seconds(recorded.t),
            recorded.heading,
        ))
    }

    /// Session duration, in seconds
    pub fn duration_s(&self) -> f64 {
        let last_fix = self.fixes.last().map(|fix| fix.t).unwrap_or_default();
        let last_heading = self.attitude.last().map(|att| att.t).unwrap_or_default();
        last_fix.max(last_heading) + 1.0
    }
}
