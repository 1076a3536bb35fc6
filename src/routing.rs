//! Routing collaborators
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::GeoPoint,
    location::Fix,
    route::{Route, Waypoint},
};

/// Answer of the routing collaborator. Every field is optional:
/// a missing field means "no update" for that field.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteUpdate {
    /// Name of the next waypoint
    #[cfg_attr(feature = "serde", serde(default))]
    pub next_waypoint_name: Option<String>,
    /// Coordinates of the next waypoint
    #[cfg_attr(feature = "serde", serde(default))]
    pub next_waypoint_coordinates: Option<GeoPoint>,
    /// Remaining route, from the next waypoint to destination
    #[cfg_attr(feature = "serde", serde(default))]
    pub remaining_route: Option<Vec<Waypoint>>,
}

impl RouteUpdate {
    /// [RouteUpdate] that only names the next waypoint.
    pub fn named(name: &str) -> Self {
        Self {
            next_waypoint_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// [RouteUpdate] that proposes the next [Waypoint].
    pub fn waypoint(waypoint: &Waypoint) -> Self {
        Self {
            next_waypoint_name: Some(waypoint.name.clone()),
            next_waypoint_coordinates: Some(waypoint.coordinates),
            ..Default::default()
        }
    }

    /// [RouteUpdate] that proposes a complete remaining [Route].
    pub fn from_route(route: &Route) -> Self {
        Self {
            remaining_route: Some(route.waypoints().cloned().collect()),
            ..Default::default()
        }
    }

    /// True if this [RouteUpdate] carries nothing.
    pub fn is_empty(&self) -> bool {
        self.next_waypoint_name.is_none()
            && self.next_waypoint_coordinates.is_none()
            && self.remaining_route.is_none()
    }
}

/// Any routing backend should implement the [Router] trait.
/// It is polled by the engine, on a fixed cadence, never the other way around.
pub trait Router {
    /// Proposes the next waypoint, and possibly the remaining route,
    /// from the current [Fix]. Failures are absorbed by the engine,
    /// which keeps the last known good target and retries on
    /// the next refresh.
    fn refresh(&mut self, fix: &Fix) -> Result<RouteUpdate, Error>;
}

/// Name to coordinates lookup, used when the [Router]
/// only returns a waypoint name.
pub trait NameResolver {
    /// Returns the coordinates of this named place, None if unknown.
    fn resolve(&self, name: &str) -> Option<GeoPoint>;
}

/// [NameResolver] that knows no place.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullResolver {}

impl NameResolver for NullResolver {
    fn resolve(&self, _: &str) -> Option<GeoPoint> {
        None
    }
}

/// [Router] serving a [Route] that is entirely known ahead of time.
/// It never proposes anything new, the engine progresses along
/// the route by skipping ahead.
#[derive(Debug, Clone)]
pub struct FixedRoute {
    route: Route,
    served: bool,
}

impl FixedRoute {
    /// Builds a [FixedRoute] from [Route]
    pub fn new(route: Route) -> Self {
        Self {
            route,
            served: false,
        }
    }
}

impl Router for FixedRoute {
    fn refresh(&mut self, _: &Fix) -> Result<RouteUpdate, Error> {
        if self.served {
            Ok(RouteUpdate::default())
        } else {
            self.served = true;
            Ok(RouteUpdate::from_route(&self.route))
        }
    }
}
