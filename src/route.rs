//! Route and route cursor
use itertools::Itertools;
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::{distance, GeoPoint},
    location::Fix,
    prelude::Config,
    routing::{NameResolver, RouteUpdate},
};

/// Named point of the route, with known coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Readable name
    pub name: String,
    /// Coordinates
    pub coordinates: GeoPoint,
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.name, self.coordinates)
    }
}

impl Waypoint {
    /// Builds a new [Waypoint]
    pub fn new(name: &str, coordinates: GeoPoint) -> Self {
        Self {
            name: name.to_string(),
            coordinates,
        }
    }
}

/// Ordered and non empty sequence of [Waypoint]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl TryFrom<Vec<Waypoint>> for Route {
    type Error = Error;
    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl Route {
    /// Builds a new [Route]. Empty routes are rejected.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, Error> {
        if waypoints.is_empty() {
            Err(Error::EmptyRoute)
        } else {
            Ok(Self { waypoints })
        }
    }

    /// Builds a new [Route] from a bare list of (latitude, longitude)
    /// coordinates, as returned by path finding backends.
    pub fn from_path(path: &[(f64, f64)]) -> Result<Self, Error> {
        Self::new(
            path.iter()
                .enumerate()
                .map(|(index, lat_lon)| {
                    Waypoint::new(&format!("waypoint #{}", index), GeoPoint::from(*lat_lon))
                })
                .collect(),
        )
    }

    /// Number of [Waypoint]s
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Never true: [Route]s are not empty by construction.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First [Waypoint]
    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    /// Last [Waypoint]: the destination
    pub fn destination(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// [Waypoint] at position `index`
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Iterates over all [Waypoint]s
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    /// Total length of the legs (meters)
    pub fn length_m(&self) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| distance(&a.coordinates, &b.coordinates))
            .sum()
    }

    /// All [Waypoint]s, in order
    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Position of this [Waypoint] in [Self]
    pub fn position(&self, waypoint: &Waypoint) -> Option<usize> {
        self.waypoints.iter().position(|wp| wp == waypoint)
    }
}

/// Outcome of a routing collaborator refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Collaborator had nothing new
    Unchanged,
    /// Target and/or remaining route were replaced
    Updated,
}

/// [RouteCursor] holds the current target and the latest known route.
/// The route is never consumed: progress is the position of the target
/// within it. A target proposed outside of the route is considered
/// to precede its first entry.
#[derive(Debug, Clone, Default)]
pub struct RouteCursor {
    /// Current target
    target: Option<Waypoint>,
    /// Latest known [Route]
    route: Option<Route>,
    /// Skip-ahead radius (m)
    skip_ahead_radius_m: f64,
}

impl RouteCursor {
    /// Builds an empty [RouteCursor]: the target is unknown
    /// until the first refresh.
    pub fn new(cfg: &Config) -> Self {
        Self {
            target: None,
            route: None,
            skip_ahead_radius_m: cfg.skip_ahead_radius_m,
        }
    }

    /// Builds a [RouteCursor] targeting the first [Waypoint] of this [Route].
    pub fn with_route(cfg: &Config, route: Route) -> Self {
        let mut s = Self::new(cfg);
        s.target = Some(route.first().clone());
        s.route = Some(route);
        s
    }

    /// Current target
    pub fn target(&self) -> Option<&Waypoint> {
        self.target.as_ref()
    }

    /// Index, within the known route, of the first [Waypoint]
    /// that follows the target.
    fn next_index(&self) -> Option<usize> {
        let (target, route) = (self.target.as_ref()?, self.route.as_ref()?);
        Some(route.position(target).map_or(0, |index| index + 1))
    }

    /// Remaining waypoints, when the route is known: the target
    /// (when it belongs to the route) and every [Waypoint] past it.
    pub fn remaining(&self) -> Option<&[Waypoint]> {
        let (target, route) = (self.target.as_ref()?, self.route.as_ref()?);
        let from = route.position(target).unwrap_or(0);
        Some(&route.as_slice()[from..])
    }

    /// Distance (m) left to walk from `fix`: to the target,
    /// then along the rest of the known route.
    pub fn remaining_distance_m(&self, fix: &Fix) -> Option<f64> {
        let target = self.target.as_ref()?;
        let mut total = distance(&fix.point, &target.coordinates);
        if let (Some(next), Some(route)) = (self.next_index(), &self.route) {
            total += std::iter::once(target)
                .chain(route.as_slice()[next..].iter())
                .tuple_windows()
                .map(|(a, b)| distance(&a.coordinates, &b.coordinates))
                .sum::<f64>();
        }
        Some(total)
    }

    /// Updates [Self] with a new [Fix]. While the target lies within the
    /// skip-ahead radius and is not the destination, the target moves to
    /// the following [Waypoint] of the route. This prevents oscillating
    /// between waypoints that lie within the GPS noise radius.
    /// Returns true if the target changed.
    pub fn on_tick(&mut self, fix: &Fix) -> bool {
        let (mut target, route) = match (&self.target, &self.route) {
            (Some(target), Some(route)) => (target, route),
            _ => return false,
        };

        let mut next = match self.next_index() {
            Some(next) => next,
            None => return false,
        };

        let mut skipped = false;

        while let Some(following) = route.get(next) {
            let distance_m = distance(&fix.point, &target.coordinates);
            if distance_m >= self.skip_ahead_radius_m {
                break;
            }

            info!(
                "{} - {:.1}m from {}: skipping ahead to {}",
                fix.t, distance_m, target.name, following
            );

            target = following;
            next += 1;
            skipped = true;
        }

        if skipped {
            self.target = Some(target.clone());
        }

        skipped
    }

    /// Applies a [RouteUpdate] proposed by the routing collaborator.
    /// Waypoint names without coordinates are resolved with the
    /// [NameResolver]. On any error, [Self] is left untouched.
    pub fn apply<N: NameResolver>(
        &mut self,
        update: RouteUpdate,
        resolver: &N,
    ) -> Result<RefreshOutcome, Error> {
        let RouteUpdate {
            next_waypoint_name,
            next_waypoint_coordinates,
            remaining_route,
        } = update;

        // an empty route is no update at all
        let remaining = remaining_route.and_then(|waypoints| Route::new(waypoints).ok());

        let next = match (next_waypoint_name, next_waypoint_coordinates) {
            (name, Some(coordinates)) => {
                let name = name.unwrap_or_else(|| "next waypoint".to_string());
                Some(Waypoint::new(&name, coordinates))
            },
            (Some(name), None) => match resolver.resolve(&name) {
                Some(coordinates) => Some(Waypoint::new(&name, coordinates)),
                None => return Err(Error::UnresolvedWaypoint(name)),
            },
            (None, None) => None,
        };

        let target = match (next, &remaining) {
            (Some(next), _) => next,
            (None, Some(route)) => route.first().clone(),
            (None, None) => return Ok(RefreshOutcome::Unchanged),
        };

        if self.target.as_ref() == Some(&target) && remaining.is_none() {
            return Ok(RefreshOutcome::Unchanged);
        }

        if self.target.as_ref() != Some(&target) {
            info!("new target {}", target);
        }

        if let Some(route) = remaining {
            debug!("remaining route: {} waypoints", route.len());
            self.route = Some(route);
        }

        self.target = Some(target);
        Ok(RefreshOutcome::Updated)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geodesy::destination;
    use crate::prelude::Epoch;
    use std::collections::HashMap;

    struct Gazetteer(HashMap<String, GeoPoint>);

    impl NameResolver for Gazetteer {
        fn resolve(&self, name: &str) -> Option<GeoPoint> {
            self.0.get(name).copied()
        }
    }

    fn gazetteer() -> Gazetteer {
        Gazetteer(HashMap::from([(
            "ECE Block".to_string(),
            GeoPoint::new(13.331624, 77.127282),
        )]))
    }

    fn fix_at(point: GeoPoint) -> Fix {
        Fix::new(
            Epoch::from_gregorian_utc_at_midnight(2025, 3, 1),
            point.latitude,
            point.longitude,
        )
    }

    fn three_waypoints() -> Route {
        let w1 = GeoPoint::new(12.0, 77.0);
        let w2 = destination(&w1, 0.0, 30.0);
        let w3 = destination(&w2, std::f64::consts::FRAC_PI_2, 40.0);
        Route::new(vec![
            Waypoint::new("W1", w1),
            Waypoint::new("W2", w2),
            Waypoint::new("W3", w3),
        ])
        .unwrap()
    }

    #[test]
    fn route_construction() {
        assert_eq!(Route::new(vec![]), Err(Error::EmptyRoute));
        assert_eq!(Route::from_path(&[]), Err(Error::EmptyRoute));

        let route = Route::from_path(&[(12.0, 77.0), (12.001, 77.0)]).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.first().name, "waypoint #0");
        assert_eq!(route.destination().name, "waypoint #1");
        assert!((route.length_m() - 111.19).abs() < 0.1);

        let route = three_waypoints();
        assert!((route.length_m() - 70.0).abs() < 1.0E-6);
    }

    #[test]
    fn skip_ahead() {
        let cfg = Config::default();
        let route = three_waypoints();
        let w1 = route.first().coordinates;
        let mut cursor = RouteCursor::with_route(&cfg, route);

        // far away: nothing happens
        let far = destination(&w1, std::f64::consts::PI, 50.0);
        assert!(!cursor.on_tick(&fix_at(far)));
        assert_eq!(cursor.target().unwrap().name, "W1");

        // within 10m of W1: W2 becomes the target
        let near = destination(&w1, std::f64::consts::PI, 6.0);
        assert!(cursor.on_tick(&fix_at(near)));
        assert_eq!(cursor.target().unwrap().name, "W2");
        assert_eq!(cursor.remaining().unwrap().len(), 2);
    }

    #[test]
    fn skip_ahead_over_clustered_waypoints() {
        let cfg = Config::default();
        let w1 = GeoPoint::new(12.0, 77.0);
        let w2 = destination(&w1, 0.0, 5.0);
        let w3 = destination(&w2, 0.0, 200.0);
        let route = Route::new(vec![
            Waypoint::new("W1", w1),
            Waypoint::new("W2", w2),
            Waypoint::new("W3", w3),
        ])
        .unwrap();

        let mut cursor = RouteCursor::with_route(&cfg, route);

        // W1 and W2 both within radius: W3 becomes the target
        assert!(cursor.on_tick(&fix_at(w1)));
        assert_eq!(cursor.target().unwrap().name, "W3");
        assert_eq!(cursor.remaining().unwrap().len(), 1);
    }

    #[test]
    fn skip_ahead_after_update() {
        let cfg = Config::default();
        let resolver = gazetteer();
        let route = three_waypoints();
        let w1 = route.first().clone();
        let near = fix_at(destination(&w1.coordinates, std::f64::consts::PI, 3.0));

        let mut cursor = RouteCursor::with_route(&cfg, route);
        assert!(cursor.on_tick(&near));
        assert_eq!(cursor.target().unwrap().name, "W2");

        // collaborator still proposes W1
        let outcome = cursor.apply(RouteUpdate::waypoint(&w1), &resolver).unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(cursor.target().unwrap().name, "W1");
        assert_eq!(cursor.remaining().unwrap().len(), 3);

        // W2 is not lost
        assert!(cursor.on_tick(&near));
        assert_eq!(cursor.target().unwrap().name, "W2");
        assert_eq!(cursor.remaining().unwrap().len(), 2);
    }

    #[test]
    fn target_off_route() {
        let cfg = Config::default();
        let resolver = gazetteer();
        let route = three_waypoints();
        let w1 = route.first().coordinates;
        let mut cursor = RouteCursor::with_route(&cfg, route);

        let detour = Waypoint::new("detour", destination(&w1, std::f64::consts::PI, 20.0));
        cursor.apply(RouteUpdate::waypoint(&detour), &resolver).unwrap();
        assert_eq!(cursor.remaining().unwrap().len(), 3);

        // detour, then the whole route
        let remaining = cursor.remaining_distance_m(&fix_at(detour.coordinates)).unwrap();
        assert!((remaining - 90.0).abs() < 1.0E-3, "remaining {}", remaining);

        // the detour precedes the route
        assert!(cursor.on_tick(&fix_at(detour.coordinates)));
        assert_eq!(cursor.target().unwrap().name, "W1");
    }

    #[test]
    fn last_waypoint_is_never_skipped() {
        let cfg = Config::default();
        let target = GeoPoint::new(12.0, 77.0);
        let route = Route::new(vec![Waypoint::new("end", target)]).unwrap();
        let mut cursor = RouteCursor::with_route(&cfg, route);
        assert!(!cursor.on_tick(&fix_at(target)));
        assert_eq!(cursor.target().unwrap().name, "end");
    }

    #[test]
    fn remaining_distance() {
        let cfg = Config::default();
        let route = three_waypoints();
        let w1 = route.first().coordinates;
        let cursor = RouteCursor::with_route(&cfg, route);
        let start = destination(&w1, std::f64::consts::PI, 20.0);
        let remaining = cursor.remaining_distance_m(&fix_at(start)).unwrap();
        assert!((remaining - 90.0).abs() < 1.0E-3, "remaining {}", remaining);
    }

    #[test]
    fn updates() {
        let cfg = Config::default();
        let resolver = gazetteer();
        let mut cursor = RouteCursor::new(&cfg);

        // nothing proposed
        let outcome = cursor.apply(RouteUpdate::default(), &resolver).unwrap();
        assert_eq!(outcome, RefreshOutcome::Unchanged);
        assert!(cursor.target().is_none());

        // name only: resolved
        let update = RouteUpdate::named("ECE Block");
        let outcome = cursor.apply(update.clone(), &resolver).unwrap();
        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(cursor.target().unwrap().name, "ECE Block");

        // same proposal twice
        let outcome = cursor.apply(update, &resolver).unwrap();
        assert_eq!(outcome, RefreshOutcome::Unchanged);

        // unknown name: discarded
        let before = cursor.target().cloned();
        assert_eq!(
            cursor.apply(RouteUpdate::named("Library"), &resolver),
            Err(Error::UnresolvedWaypoint("Library".to_string()))
        );
        assert_eq!(cursor.target().cloned(), before);

        // remaining route only: targets its first waypoint
        let route = three_waypoints();
        let update = RouteUpdate::from_route(&route);
        cursor.apply(update, &resolver).unwrap();
        assert_eq!(cursor.target().unwrap().name, "W1");
        assert_eq!(cursor.remaining().unwrap().len(), 3);

        // empty route is no update
        let update = RouteUpdate {
            remaining_route: Some(vec![]),
            ..Default::default()
        };
        let outcome = cursor.apply(update, &resolver).unwrap();
        assert_eq!(outcome, RefreshOutcome::Unchanged);
        assert_eq!(cursor.target().unwrap().name, "W1");
    }
}
