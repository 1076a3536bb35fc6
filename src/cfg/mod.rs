use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_ARRIVAL_RADIUS_M, DEFAULT_DEVICE_HEADING_WEIGHT, DEFAULT_MIN_MOVEMENT_M,
        DEFAULT_REFRESH_PERIOD_S, DEFAULT_SKIP_AHEAD_RADIUS_M, DEFAULT_SMOOTHING_WINDOW,
        DEFAULT_TURN_ALERT_COOLDOWN_S, DEFAULT_TURN_ALERT_RADIUS_M,
        DEFAULT_TURN_BEARING_DELTA_DEG,
    },
    prelude::Duration,
};

mod health;
mod source;

pub use health::HealthConfig;
pub use source::{Capabilities, OrientationSource};

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown orientation source")]
    InvalidOrientationSource,
    #[error("invalid parameter \"{0}\"")]
    InvalidParameter(&'static str),
}

const fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

const fn default_skip_ahead_radius() -> f64 {
    DEFAULT_SKIP_AHEAD_RADIUS_M
}

const fn default_arrival_radius() -> f64 {
    DEFAULT_ARRIVAL_RADIUS_M
}

const fn default_turn_alert_radius() -> f64 {
    DEFAULT_TURN_ALERT_RADIUS_M
}

const fn default_turn_bearing_delta() -> f64 {
    DEFAULT_TURN_BEARING_DELTA_DEG
}

fn default_turn_alert_cooldown() -> Duration {
    Duration::from_seconds(DEFAULT_TURN_ALERT_COOLDOWN_S)
}

const fn default_device_heading_weight() -> f64 {
    DEFAULT_DEVICE_HEADING_WEIGHT
}

const fn default_min_movement() -> f64 {
    DEFAULT_MIN_MOVEMENT_M
}

fn default_refresh_period() -> Duration {
    Duration::from_seconds(DEFAULT_REFRESH_PERIOD_S)
}

const fn default_bearing_smoothing() -> f64 {
    1.0
}

/// [Config] gathers every tunable of the wayfinding engine.
/// Default values were tuned for a pedestrian holding a
/// consumer grade phone: iterate on them, not on the logic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of raw fixes averaged by the location sampler.
    #[cfg_attr(feature = "serde", serde(default = "default_smoothing_window"))]
    pub smoothing_window: usize,
    /// When closer than this to the current target (in meters), and the
    /// remaining route is known, the target skips ahead to the following waypoint.
    #[cfg_attr(feature = "serde", serde(default = "default_skip_ahead_radius"))]
    pub skip_ahead_radius_m: f64,
    /// Closer than this to the target (in meters) means we arrived.
    #[cfg_attr(feature = "serde", serde(default = "default_arrival_radius"))]
    pub arrival_radius_m: f64,
    /// Turns are only announced when closer than this to the target (in meters).
    #[cfg_attr(feature = "serde", serde(default = "default_turn_alert_radius"))]
    pub turn_alert_radius_m: f64,
    /// Bearing to target change between two observations (in degrees)
    /// that qualifies as a turn.
    #[cfg_attr(feature = "serde", serde(default = "default_turn_bearing_delta"))]
    pub turn_bearing_delta_deg: f64,
    /// Minimal period between two turn alerts.
    #[cfg_attr(feature = "serde", serde(default = "default_turn_alert_cooldown"))]
    pub turn_alert_cooldown: Duration,
    /// Weight of the device heading in the fused heading, within [0, 1].
    /// The heading derived from displacement weighs the complement.
    #[cfg_attr(feature = "serde", serde(default = "default_device_heading_weight"))]
    pub device_heading_weight: f64,
    /// Minimal displacement between two smoothed fixes (in meters)
    /// for a movement heading to exist.
    #[cfg_attr(feature = "serde", serde(default = "default_min_movement"))]
    pub min_movement_m: f64,
    /// Routing collaborator refresh period.
    #[cfg_attr(feature = "serde", serde(default = "default_refresh_period"))]
    pub refresh_period: Duration,
    /// Fixes whose accuracy hint (in meters) is worse than this are rejected.
    /// No accuracy gate by default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_fix_accuracy_m: Option<f64>,
    /// Low-pass factor applied to the relative bearing output, within ]0, 1].
    /// 1.0 disables the output smoothing.
    #[cfg_attr(feature = "serde", serde(default = "default_bearing_smoothing"))]
    pub bearing_smoothing: f64,
    /// Tracking [HealthConfig]
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: HealthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smoothing_window: default_smoothing_window(),
            skip_ahead_radius_m: default_skip_ahead_radius(),
            arrival_radius_m: default_arrival_radius(),
            turn_alert_radius_m: default_turn_alert_radius(),
            turn_bearing_delta_deg: default_turn_bearing_delta(),
            turn_alert_cooldown: default_turn_alert_cooldown(),
            device_heading_weight: default_device_heading_weight(),
            min_movement_m: default_min_movement(),
            refresh_period: default_refresh_period(),
            max_fix_accuracy_m: None,
            bearing_smoothing: default_bearing_smoothing(),
            health: HealthConfig::default(),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "window={} skip={}m arrival={}m turn={}m/{}° weight={} refresh={} ({})",
            self.smoothing_window,
            self.skip_ahead_radius_m,
            self.arrival_radius_m,
            self.turn_alert_radius_m,
            self.turn_bearing_delta_deg,
            self.device_heading_weight,
            self.refresh_period,
            self.health,
        )
    }
}

impl Config {
    /// Bearing change (rad) that qualifies as a turn.
    pub(crate) fn turn_bearing_delta_rad(&self) -> f64 {
        self.turn_bearing_delta_deg.to_radians()
    }

    /// Weight of the movement heading in the fused heading.
    pub(crate) fn movement_heading_weight(&self) -> f64 {
        1.0 - self.device_heading_weight
    }

    /// Verifies this [Config] is physically meaningful.
    pub fn validate(&self) -> Result<(), Error> {
        if self.smoothing_window == 0 {
            return Err(Error::InvalidParameter("smoothing_window"));
        }
        if !(0.0..=1.0).contains(&self.device_heading_weight) {
            return Err(Error::InvalidParameter("device_heading_weight"));
        }
        if !(self.bearing_smoothing > 0.0 && self.bearing_smoothing <= 1.0) {
            return Err(Error::InvalidParameter("bearing_smoothing"));
        }
        if self.arrival_radius_m <= 0.0 {
            return Err(Error::InvalidParameter("arrival_radius_m"));
        }
        // arriving at an intermediate waypoint would terminate the session
        if self.skip_ahead_radius_m < self.arrival_radius_m {
            return Err(Error::InvalidParameter("skip_ahead_radius_m"));
        }
        if self.turn_alert_radius_m < 0.0 {
            return Err(Error::InvalidParameter("turn_alert_radius_m"));
        }
        if self.health.max_video_frame_age <= Duration::ZERO {
            return Err(Error::InvalidParameter("max_video_frame_age"));
        }
        if self.min_movement_m < 0.0 {
            return Err(Error::InvalidParameter("min_movement_m"));
        }
        if self.refresh_period <= Duration::ZERO {
            return Err(Error::InvalidParameter("refresh_period"));
        }
        Ok(())
    }

    /// Copies and returns [Config] with updated smoothing window.
    pub fn with_smoothing_window(&self, window: usize) -> Self {
        let mut s = self.clone();
        s.smoothing_window = window;
        s
    }

    /// Copies and returns [Config] with updated skip-ahead radius.
    pub fn with_skip_ahead_radius_m(&self, radius_m: f64) -> Self {
        let mut s = self.clone();
        s.skip_ahead_radius_m = radius_m;
        s
    }

    /// Copies and returns [Config] with updated arrival radius.
    pub fn with_arrival_radius_m(&self, radius_m: f64) -> Self {
        let mut s = self.clone();
        s.arrival_radius_m = radius_m;
        s
    }

    /// Copies and returns [Config] with updated turn alert radius.
    pub fn with_turn_alert_radius_m(&self, radius_m: f64) -> Self {
        let mut s = self.clone();
        s.turn_alert_radius_m = radius_m;
        s
    }

    /// Copies and returns [Config] with updated device heading weight.
    pub fn with_device_heading_weight(&self, weight: f64) -> Self {
        let mut s = self.clone();
        s.device_heading_weight = weight;
        s
    }

    /// Copies and returns [Config] with an accuracy gate on fixes.
    pub fn with_max_fix_accuracy_m(&self, accuracy_m: f64) -> Self {
        let mut s = self.clone();
        s.max_fix_accuracy_m = Some(accuracy_m);
        s
    }

    /// Copies and returns [Config] with updated output smoothing factor.
    pub fn with_bearing_smoothing(&self, factor: f64) -> Self {
        let mut s = self.clone();
        s.bearing_smoothing = factor;
        s
    }

    /// Copies and returns [Config] with updated [HealthConfig].
    pub fn with_health(&self, health: HealthConfig) -> Self {
        let mut s = self.clone();
        s.health = health;
        s
    }
}
