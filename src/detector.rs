//! Turn and arrival detection
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    geodesy::angle_difference,
    prelude::{Config, Duration, Epoch},
};

/// Navigation session state. Only the [Detector] makes it evolve.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NavigationState {
    /// No fix (or no target) yet
    #[default]
    AwaitingFix,
    /// Steady state: walking toward the target
    Navigating,
    /// Close to the target and the direction to follow just changed
    ApproachingTurn,
    /// Destination reached. Terminal for this session.
    Arrived,
}

impl NavigationState {
    /// True once this session has terminated
    pub fn is_terminal(&self) -> bool {
        *self == Self::Arrived
    }
}

impl std::fmt::Display for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingFix => write!(f, "awaiting-fix"),
            Self::Navigating => write!(f, "navigating"),
            Self::ApproachingTurn => write!(f, "approaching-turn"),
            Self::Arrived => write!(f, "arrived"),
        }
    }
}

/// Discrete events, forwarded to the rendering collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// Turn ahead (short haptic pulse)
    TurnAlert,
    /// Destination reached (camera teardown, long haptic pulse)
    Arrived,
    /// Tracking health changed: camera overlay (true)
    /// or compass-and-distance fallback (false).
    TrackingHealth(bool),
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnAlert => write!(f, "turn-alert"),
            Self::Arrived => write!(f, "arrived"),
            Self::TrackingHealth(healthy) => write!(f, "tracking-healthy={}", healthy),
        }
    }
}

/// One observation of the target, from the current fix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Observation {
    /// Observation [Epoch]
    pub t: Epoch,
    /// Distance to target (m)
    pub distance_m: f64,
    /// Bearing to target (rad)
    pub bearing: f64,
}

/// [Detector] classifies the navigation state from the distance
/// and the bearing to target, and emits the discrete [Event]s.
#[derive(Debug, Clone)]
pub struct Detector {
    /// Current [NavigationState]
    state: NavigationState,
    /// Arrival radius (m)
    arrival_radius_m: f64,
    /// Turn alert radius (m)
    turn_alert_radius_m: f64,
    /// Bearing change qualifying as a turn (rad)
    turn_delta_rad: f64,
    /// Minimal period between two alerts
    cooldown: Duration,
    /// Bearing to target at previous observation
    prev_bearing: Option<f64>,
    /// Latest turn alert
    last_alert: Option<Epoch>,
}

impl Detector {
    /// Builds a new [Detector] from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            state: NavigationState::AwaitingFix,
            arrival_radius_m: cfg.arrival_radius_m,
            turn_alert_radius_m: cfg.turn_alert_radius_m,
            turn_delta_rad: cfg.turn_bearing_delta_rad(),
            cooldown: cfg.turn_alert_cooldown,
            prev_bearing: None,
            last_alert: None,
        }
    }

    /// Current [NavigationState]
    pub fn state(&self) -> NavigationState {
        self.state
    }

    fn transition(&mut self, t: Epoch, state: NavigationState) {
        if self.state != state {
            info!("{} - {} -> {}", t, self.state, state);
            self.state = state;
        }
    }

    fn alert_allowed(&self, t: Epoch) -> bool {
        match self.last_alert {
            Some(last) => t - last >= self.cooldown,
            None => true,
        }
    }

    /// Updates [Self] with a new [Observation]. Returns the [Event]
    /// this observation triggered, if any. Once [NavigationState::Arrived],
    /// observations are ignored.
    pub fn update(&mut self, obs: &Observation) -> Option<Event> {
        if self.state.is_terminal() {
            return None;
        }

        if self.state == NavigationState::AwaitingFix {
            self.transition(obs.t, NavigationState::Navigating);
        }

        let delta = self
            .prev_bearing
            .map(|prev| angle_difference(obs.bearing, prev).abs());

        self.prev_bearing = Some(obs.bearing);

        if obs.distance_m < self.arrival_radius_m {
            self.transition(obs.t, NavigationState::Arrived);
            return Some(Event::Arrived);
        }

        let turning = obs.distance_m < self.turn_alert_radius_m
            && delta.is_some_and(|delta| delta > self.turn_delta_rad);

        if let Some(delta) = delta {
            debug!(
                "{} - {:.1}m bearing {:.1}° (Δ={:.1}°)",
                obs.t,
                obs.distance_m,
                obs.bearing.to_degrees(),
                delta.to_degrees()
            );
        }

        if !turning {
            // bearing stabilized, or we're moving away
            self.transition(obs.t, NavigationState::Navigating);
            return None;
        }

        self.transition(obs.t, NavigationState::ApproachingTurn);

        if self.alert_allowed(obs.t) {
            self.last_alert = Some(obs.t);
            Some(Event::TurnAlert)
        } else {
            debug!("{} - turn alert rate limited", obs.t);
            None
        }
    }
}
