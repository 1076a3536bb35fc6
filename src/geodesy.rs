//! Great-circle geodesy over a spherical Earth
use std::f64::consts::PI;

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_MEAN_RADIUS_M, TWO_PI};

/// Geographic coordinates, in decimal degrees.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    /// Latitude (ddeg), positive north
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub latitude: f64,
    /// Longitude (ddeg), positive east
    #[cfg_attr(feature = "serde", serde(alias = "lon", alias = "lng"))]
    pub longitude: f64,
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lat={:.7}°, lon={:.7}°", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(lat_lon: (f64, f64)) -> Self {
        Self::new(lat_lon.0, lat_lon.1)
    }
}

impl From<Vector2<f64>> for GeoPoint {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v[0], v[1])
    }
}

impl GeoPoint {
    /// Builds new [GeoPoint] from latitude and longitude in decimal degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True if both coordinates are finite and within their
    /// respective domains.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    /// Returns (latitude, longitude) as [Vector2], in decimal degrees.
    pub(crate) fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.latitude, self.longitude)
    }
}

/// Initial great-circle bearing (forward azimuth) from `from` to `to`,
/// in radians within [0, 2π), 0 being true north.
/// Identical points return 0.
pub fn bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }

    let (lat1, lat2) = (from.latitude.to_radians(), to.latitude.to_radians());
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_angle(y.atan2(x))
}

/// Haversine distance between `a` and `b`, in meters.
/// Symmetric, never negative, 0 for identical points.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // rounding may push h slightly out of [0, 1]
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().asin()
}

/// Point reached when travelling `distance_m` from `from`
/// along the great circle of initial `bearing_rad`.
pub fn destination(from: &GeoPoint, bearing_rad: f64, distance_m: f64) -> GeoPoint {
    let delta = distance_m / EARTH_MEAN_RADIUS_M;
    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing_rad.cos()).asin();

    let lon2 = lon1
        + (bearing_rad.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    // wrap longitude into [-180, 180)
    let lon2 = (lon2 + PI).rem_euclid(TWO_PI) - PI;

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Wraps any angle (rad) into [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TWO_PI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Wraps any angle (rad) into (-π, π].
pub fn signed_angle(angle: f64) -> f64 {
    let wrapped = normalize_angle(angle);
    if wrapped > PI {
        wrapped - TWO_PI
    } else {
        wrapped
    }
}

/// Smallest signed rotation (rad) that brings `from` onto `to`, within (-π, π].
pub fn angle_difference(to: f64, from: f64) -> f64 {
    signed_angle(to - from)
}
