//! Engine output
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    detector::{Event, NavigationState},
    fusion::FusedHeading,
    geodesy::{angle_difference, signed_angle},
    health::HealthReport,
    prelude::Epoch,
    route::Waypoint,
};

/// Direction of the target relative to where the device points,
/// in radians within (-π, π]. Positive means "turn right".
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RelativeBearing(f64);

impl std::fmt::Display for RelativeBearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+.1}°", self.degrees())
    }
}

impl RelativeBearing {
    /// Builds [RelativeBearing] from the bearing to target
    /// and the current heading, both in radians.
    pub fn new(target_bearing: f64, heading: f64) -> Self {
        Self(angle_difference(target_bearing, heading))
    }

    /// Builds [RelativeBearing] from any angle (radians).
    pub fn from_radians(angle: f64) -> Self {
        Self(signed_angle(angle))
    }

    /// Value in radians, within (-π, π]
    pub fn radians(&self) -> f64 {
        self.0
    }

    /// Value in degrees, within (-180, 180]
    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }
}

/// First order low-pass applied on the circle.
/// A factor of 1.0 forwards the input untouched.
#[derive(Debug, Clone, Default)]
pub(crate) struct BearingSmoother {
    factor: f64,
    state: Option<RelativeBearing>,
}

impl BearingSmoother {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            state: None,
        }
    }

    /// Updates [Self] with a new input. An undefined input
    /// resets the filter, so it never outputs a stale value.
    pub fn update(&mut self, input: Option<RelativeBearing>) -> Option<RelativeBearing> {
        let input = match input {
            Some(input) => input,
            None => {
                self.state = None;
                return None;
            },
        };

        let output = match self.state {
            Some(state) => {
                let delta = angle_difference(input.radians(), state.radians());
                RelativeBearing::from_radians(state.radians() + self.factor * delta)
            },
            None => input,
        };

        self.state = Some(output);
        Some(output)
    }
}

/// [Output] is produced on every render tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Output {
    /// Tick [Epoch]
    pub t: Epoch,
    /// Current [NavigationState]
    pub state: NavigationState,
    /// Current target, once known
    pub target: Option<Waypoint>,
    /// Where the target lies relative to the device heading.
    /// Undefined until both a target and a heading exist.
    pub relative_bearing: Option<RelativeBearing>,
    /// Fused heading, once defined
    #[cfg_attr(feature = "serde", serde(skip))]
    pub heading: Option<FusedHeading>,
    /// Distance to target (m)
    pub distance_m: Option<f64>,
    /// Distance to destination (m), along the remaining route when known
    pub remaining_distance_m: Option<f64>,
    /// Tracking [HealthReport]
    #[cfg_attr(feature = "serde", serde(skip))]
    pub health: HealthReport,
    /// [Event]s raised during this tick
    #[cfg_attr(feature = "serde", serde(skip))]
    pub events: Vec<Event>,
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.t, self.state)?;
        if let Some(target) = &self.target {
            write!(f, " target={}", target)?;
        }
        if let Some(distance_m) = self.distance_m {
            write!(f, " distance={:.1}m", distance_m)?;
        }
        match self.relative_bearing {
            Some(bearing) => write!(f, " bearing={}", bearing)?,
            None => write!(f, " bearing=n/a")?,
        }
        for event in self.events.iter() {
            write!(f, " <{}>", event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(90.0, 0.0, 90.0)]
    #[case(10.0, 350.0, 20.0)]
    #[case(350.0, 10.0, -20.0)]
    #[case(0.0, 180.0, 180.0)]
    #[case(270.0, 0.0, -90.0)]
    fn relative_bearing(#[case] target_deg: f64, #[case] heading_deg: f64, #[case] expected: f64) {
        let bearing = RelativeBearing::new(target_deg.to_radians(), heading_deg.to_radians());
        assert!(
            (bearing.degrees() - expected).abs() < 1.0E-9,
            "got {}",
            bearing
        );
    }

    #[test]
    fn passthrough_smoother() {
        let mut smoother = BearingSmoother::new(1.0);
        for degrees in [10.0_f64, -170.0, 45.0] {
            let input = RelativeBearing::from_radians(degrees.to_radians());
            let output = smoother.update(Some(input)).unwrap();
            assert!((output.degrees() - degrees).abs() < 1.0E-9);
        }
    }

    #[test]
    fn low_pass_across_south() {
        let mut smoother = BearingSmoother::new(0.5);
        smoother.update(Some(RelativeBearing::from_radians(170.0_f64.to_radians())));
        // 170° -> -170° is a 20° step: half of it is applied
        let output = smoother
            .update(Some(RelativeBearing::from_radians((-170.0_f64).to_radians())))
            .unwrap();
        assert!((output.degrees().abs() - 180.0).abs() < 1.0E-9);
    }

    #[test]
    fn undefined_input_resets() {
        let mut smoother = BearingSmoother::new(0.1);
        smoother.update(Some(RelativeBearing::from_radians(0.0)));
        assert!(smoother.update(None).is_none());
        let output = smoother
            .update(Some(RelativeBearing::from_radians(1.0)))
            .unwrap();
        assert!((output.radians() - 1.0).abs() < 1.0E-12);
    }
}
