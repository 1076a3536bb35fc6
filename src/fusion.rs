//! Device and movement heading fusion
use log::debug;

use crate::{
    geodesy::{angle_difference, bearing, distance, normalize_angle},
    location::Fix,
    orientation::HeadingSample,
    prelude::Config,
};

/// Describes which inputs contributed to a [FusedHeading]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeadingOrigin {
    /// Device heading only: no significant movement
    DeviceOnly,
    /// Device heading blended with the movement heading
    Blended,
    /// Movement heading only: orientation stream is silent
    MovementOnly,
}

impl std::fmt::Display for HeadingOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeviceOnly => write!(f, "device"),
            Self::Blended => write!(f, "blended"),
            Self::MovementOnly => write!(f, "movement"),
        }
    }
}

/// Fused heading
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FusedHeading {
    /// Heading (rad) within [0, 2π), 0 being true north
    pub radians: f64,
    /// [HeadingOrigin]
    pub origin: HeadingOrigin,
}

/// [HeadingFusion] blends the device reported heading with the heading
/// inferred from the displacement between the last two smoothed fixes.
/// The movement heading only contributes once the displacement exceeds
/// the configured gate, and with a minority weight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingFusion {
    /// Movement heading weight
    movement_weight: f64,
    /// Minimal displacement (m)
    min_movement_m: f64,
}

impl HeadingFusion {
    /// Builds [HeadingFusion] from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            movement_weight: cfg.movement_heading_weight(),
            min_movement_m: cfg.min_movement_m,
        }
    }

    /// Movement heading, defined when the displacement between
    /// `previous` and `latest` exceeds the movement gate.
    pub fn movement_heading(&self, previous: &Fix, latest: &Fix) -> Option<f64> {
        let displacement_m = distance(&previous.point, &latest.point);
        if displacement_m > self.min_movement_m {
            Some(bearing(&previous.point, &latest.point))
        } else {
            None
        }
    }

    /// Fuses the latest device [HeadingSample] with the movement heading
    /// between the last two smoothed [Fix]es. Returns None until at least
    /// one of them exists: an unknown heading is never reported as north.
    pub fn fuse(
        &self,
        device: Option<HeadingSample>,
        last_two: Option<(Fix, Fix)>,
    ) -> Option<FusedHeading> {
        let movement =
            last_two.and_then(|(previous, latest)| self.movement_heading(&previous, &latest));

        let fused = match (device, movement) {
            (Some(device), Some(movement)) => {
                // weighted blend, evaluated on the circle
                let correction = angle_difference(movement, device.radians);
                FusedHeading {
                    radians: normalize_angle(
                        device.radians + self.movement_weight * correction,
                    ),
                    origin: HeadingOrigin::Blended,
                }
            },
            (Some(device), None) => FusedHeading {
                radians: device.radians,
                origin: HeadingOrigin::DeviceOnly,
            },
            (None, Some(movement)) => FusedHeading {
                radians: movement,
                origin: HeadingOrigin::MovementOnly,
            },
            (None, None) => return None,
        };

        debug!(
            "fused heading {:.1}° ({})",
            fused.radians.to_degrees(),
            fused.origin
        );

        Some(fused)
    }
}
