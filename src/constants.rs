/// Mean Earth radius (meters), spherical approximation used
/// by every great-circle computation of this crate.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Full turn (rad)
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// Default fix smoothing window (number of fixes)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Default skip-ahead radius (meters)
pub const DEFAULT_SKIP_AHEAD_RADIUS_M: f64 = 10.0;

/// Default arrival radius (meters)
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 8.0;

/// Default turn alert radius (meters)
pub const DEFAULT_TURN_ALERT_RADIUS_M: f64 = 12.0;

/// Default bearing change that qualifies as a turn (degrees)
pub const DEFAULT_TURN_BEARING_DELTA_DEG: f64 = 10.0;

/// Default weight of the device reported heading, in the fused heading.
/// The movement heading weight is its complement.
pub const DEFAULT_DEVICE_HEADING_WEIGHT: f64 = 0.7;

/// Default minimal displacement for a movement heading to exist (meters)
pub const DEFAULT_MIN_MOVEMENT_M: f64 = 1.0;

/// Default routing collaborator refresh period (seconds)
pub const DEFAULT_REFRESH_PERIOD_S: f64 = 5.0;

/// Default turn alert cooldown (seconds)
pub const DEFAULT_TURN_ALERT_COOLDOWN_S: f64 = 5.0;
