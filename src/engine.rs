//! Wayfinding engine
use log::{info, warn};

use crate::{
    detector::{Detector, Event, NavigationState, Observation},
    error::Error,
    fusion::{FusedHeading, HeadingFusion},
    geodesy::{bearing, distance},
    haptics::{Haptics, Pulse},
    health::{assess, HealthInputs, HealthReport},
    location::{Fix, LocationSampler},
    orientation::{AttitudeEvent, HeadingSample, OrientationSampler, Permission},
    output::{BearingSmoother, Output, RelativeBearing},
    prelude::{Capabilities, Config, Epoch, OrientationSource},
    route::{RefreshOutcome, Route, RouteCursor, Waypoint},
    routing::{NameResolver, Router},
    session::{Resource, ResourceKind, Resources},
};

/// [Wayfinder] is the orientation engine of one navigation session.
/// It consumes the sensor streams, polls the [Router] on a fixed cadence,
/// and produces an [Output] on every render tick.
///
/// Every entry point is non blocking. The engine never reads
/// the wall clock: all timing derives from the presented [Epoch]s.
pub struct Wayfinder<R: Router, N: NameResolver, H: Haptics> {
    /// Engine parametrization
    cfg: Config,
    /// [LocationSampler]
    location: LocationSampler,
    /// [OrientationSampler]
    orientation: OrientationSampler,
    /// [HeadingFusion]
    fusion: HeadingFusion,
    /// [RouteCursor]
    cursor: RouteCursor,
    /// [Detector]
    detector: Detector,
    /// Output low-pass
    smoother: BearingSmoother,
    /// Routing collaborator
    router: R,
    /// Waypoint name lookup
    resolver: N,
    /// [Haptics]
    haptics: H,
    /// Platform [Resources]
    resources: Resources,
    /// Session start
    t0: Epoch,
    /// Latest refresh attempt
    last_refresh_attempt: Option<Epoch>,
    /// Latest successful refresh
    last_refresh: Option<Epoch>,
    /// Latest video frame
    last_video_frame: Option<Epoch>,
    /// Location sequence already presented to the detector
    observed_sequence: u64,
    /// Target changed since the last observation
    target_changed: bool,
    /// Latest health verdict
    healthy: Option<bool>,
    /// [HealthReport] frozen on arrival
    final_health: Option<HealthReport>,
    /// Teardown completed
    closed: bool,
}

impl<R: Router, N: NameResolver, H: Haptics> Wayfinder<R, N, H> {
    /// Creates a new [Wayfinder] session.
    /// ## Inputs
    /// - cfg: [Config] preset
    /// - capabilities: platform [Capabilities], from which the
    ///   [OrientationSource] is selected once and for all.
    /// - router: routing collaborator, polled every [Config::refresh_period]
    /// - resolver: [NameResolver] used when the [Router] only names
    ///   the next waypoint
    /// - haptics: [Haptics] collaborator
    /// - t0: session start [Epoch]
    pub fn new(
        cfg: &Config,
        capabilities: &Capabilities,
        router: R,
        resolver: N,
        haptics: H,
        t0: Epoch,
    ) -> Result<Self, Error> {
        cfg.validate()?;

        let source = OrientationSource::select(capabilities);
        info!("{} - new session ({} orientation) {}", t0, source, cfg);

        Ok(Self {
            cfg: cfg.clone(),
            location: LocationSampler::new(cfg),
            orientation: OrientationSampler::new(source, capabilities.requires_permission),
            fusion: HeadingFusion::new(cfg),
            cursor: RouteCursor::new(cfg),
            detector: Detector::new(cfg),
            smoother: BearingSmoother::new(cfg.bearing_smoothing),
            router,
            resolver,
            haptics,
            resources: Resources::default(),
            t0,
            last_refresh_attempt: None,
            last_refresh: None,
            last_video_frame: None,
            observed_sequence: 0,
            target_changed: false,
            healthy: None,
            final_health: None,
            closed: false,
        })
    }

    /// Copies and returns [Self] navigating this [Route],
    /// known ahead of the first refresh.
    pub fn with_route(mut self, route: Route) -> Self {
        info!("{} - route of {} waypoint(s), {:.1}m", self.t0, route.len(), route.length_m());
        self.cursor = RouteCursor::with_route(&self.cfg, route);
        self.target_changed = true;
        self
    }

    /// [Config] in use
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Current [NavigationState]
    pub fn state(&self) -> NavigationState {
        self.detector.state()
    }

    /// Current target
    pub fn target(&self) -> Option<&Waypoint> {
        self.cursor.target()
    }

    /// Remaining [Waypoint]s, when the route is known
    pub fn remaining_route(&self) -> Option<&[Waypoint]> {
        self.cursor.remaining()
    }

    /// Latest smoothed [Fix]
    pub fn latest_fix(&self) -> Option<Fix> {
        self.location.latest_smoothed()
    }

    /// Selected [OrientationSource]
    pub fn orientation_source(&self) -> OrientationSource {
        self.orientation.source()
    }

    /// Orientation [Permission] status
    pub fn orientation_permission(&self) -> Permission {
        self.orientation.permission()
    }

    /// True once [Self::teardown] completed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True while [Self] holds a resource of this kind
    pub fn holds(&self, kind: ResourceKind) -> bool {
        self.resources.is_held(kind)
    }

    /// Hands a platform [Resource] over to [Self], which releases it on
    /// teardown (the camera is released as soon as we arrive).
    pub fn attach_resource(&mut self, kind: ResourceKind, mut resource: Box<dyn Resource + Send>) {
        if self.closed {
            warn!("session closed: releasing {} right away", kind);
            resource.release();
        } else {
            self.resources.attach(kind, resource);
        }
    }

    /// Presents a new raw [Fix]. Returns the updated smoothed [Fix].
    /// Rejected fixes leave [Self] untouched.
    pub fn on_location(&mut self, fix: Fix) -> Result<Fix, Error> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        self.location.push(fix).map_err(|e| {
            warn!("{} - rejected fix {}: {}", fix.t, fix.point, e);
            e
        })
    }

    /// Notifies a location stream failure. Tracking is reported unhealthy
    /// until the next accepted [Fix]. Errors that do not describe a
    /// sensor condition are ignored.
    pub fn on_location_error(&mut self, error: Error) {
        if self.closed {
            return;
        }
        if error.is_sensor_condition() {
            self.location.on_error(error);
        } else {
            warn!("not a location stream condition: {}", error);
        }
    }

    /// Presents a new [AttitudeEvent]. Returns the resulting
    /// [HeadingSample], if this event defines one.
    pub fn on_attitude(&mut self, event: &AttitudeEvent) -> Option<HeadingSample> {
        if self.closed {
            return None;
        }
        self.orientation.push(event)
    }

    /// Answer to the orientation permission handshake.
    /// When denied, the heading relies on movement only.
    pub fn on_orientation_permission(&mut self, granted: bool) {
        if !self.closed {
            self.orientation.on_permission(granted);
        }
    }

    /// Notifies an orientation stream failure. Tracking is reported
    /// unhealthy until the stream resumes.
    pub fn on_orientation_error(&mut self, error: Error) {
        if self.closed {
            return;
        }
        if error.is_sensor_condition() {
            self.orientation.on_error(error);
        } else {
            warn!("not an orientation stream condition: {}", error);
        }
    }

    /// Notifies that the rendering collaborator produced a video frame.
    pub fn on_video_frame(&mut self, t: Epoch) {
        if !self.closed {
            self.last_video_frame = Some(t);
        }
    }

    /// Polls the [Router] from the latest smoothed [Fix].
    /// On failure, the current target is retained and the error
    /// is returned: we'll retry on next cadence.
    /// Does nothing once [NavigationState::Arrived] or before the first [Fix].
    pub fn refresh(&mut self, t: Epoch) -> Result<RefreshOutcome, Error> {
        if self.closed {
            return Err(Error::SessionClosed);
        }

        if self.detector.state().is_terminal() {
            return Ok(RefreshOutcome::Unchanged);
        }

        let fix = match self.location.latest_smoothed() {
            Some(fix) => fix,
            None => return Ok(RefreshOutcome::Unchanged),
        };

        self.last_refresh_attempt = Some(t);

        let update = self.router.refresh(&fix)?;
        let outcome = self.cursor.apply(update, &self.resolver)?;

        self.last_refresh = Some(t);

        if outcome == RefreshOutcome::Updated {
            self.target_changed = true;
        }

        Ok(outcome)
    }

    /// True when a refresh is due at `t`
    fn refresh_due(&self, t: Epoch) -> bool {
        match self.last_refresh_attempt {
            Some(last) => t - last >= self.cfg.refresh_period,
            None => true,
        }
    }

    /// Presents the latest [Fix] to the route cursor and the [Detector],
    /// when it is a new observation. Returns the triggered [Event].
    fn observe(&mut self, t: Epoch, fix: &Fix) -> Option<Event> {
        let sequence = self.location.sequence();
        if sequence == self.observed_sequence && !self.target_changed {
            return None;
        }

        if self.detector.state().is_terminal() {
            return None;
        }

        if self.cursor.on_tick(fix) {
            self.smoother = BearingSmoother::new(self.cfg.bearing_smoothing);
        }

        let target = self.cursor.target()?;

        self.observed_sequence = sequence;
        self.target_changed = false;

        self.detector.update(&Observation {
            t,
            distance_m: distance(&fix.point, &target.coordinates),
            bearing: bearing(&fix.point, &target.coordinates),
        })
    }

    fn health(&self, t: Epoch) -> HealthReport {
        let inputs = HealthInputs {
            last_fix: self.location.latest_smoothed().map(|fix| fix.t),
            location_stale: self.location.is_stale(),
            orientation_available: self.orientation.is_available(),
            last_heading: self.orientation.latest().map(|sample| sample.t),
            last_video_frame: self.last_video_frame,
            last_refresh: self.last_refresh,
            session_start: self.t0,
        };
        assess(t, &inputs, &self.cfg.health)
    }

    /// Render tick: refreshes the route when due, advances the
    /// navigation state on new observations, and returns the
    /// [Output] to render.
    pub fn tick(&mut self, t: Epoch) -> Output {
        let mut events = Vec::<Event>::new();

        if !self.closed && self.refresh_due(t) && self.location.latest_smoothed().is_some() {
            if let Err(e) = self.refresh(t) {
                warn!("{} - refresh failure: {}", t, e);
            }
        }

        let fix = self.location.latest_smoothed();

        if let (false, Some(fix)) = (self.closed, fix) {
            if let Some(event) = self.observe(t, &fix) {
                match event {
                    Event::TurnAlert => {
                        info!("{} - turn ahead", t);
                        self.haptics.pulse(Pulse::Short);
                    },
                    Event::Arrived => {
                        info!("{} - arrived", t);
                        self.haptics.pulse(Pulse::Long);
                        self.resources.release(ResourceKind::Camera);
                    },
                    Event::TrackingHealth(_) => {},
                }
                events.push(event);
            }
        }

        let state = self.detector.state();

        assert!(
            state == NavigationState::AwaitingFix || self.cursor.target().is_some(),
            "target must be defined once navigating"
        );

        let target = self.cursor.target().cloned();

        let heading: Option<FusedHeading> = self
            .fusion
            .fuse(self.orientation.latest(), self.location.last_two());

        let raw_bearing = match (&fix, &target, heading) {
            (Some(fix), Some(target), Some(heading)) => Some(RelativeBearing::new(
                bearing(&fix.point, &target.coordinates),
                heading.radians,
            )),
            _ => None,
        };

        let relative_bearing = self.smoother.update(raw_bearing);

        let distance_m = match (&fix, &target) {
            (Some(fix), Some(target)) => Some(distance(&fix.point, &target.coordinates)),
            _ => None,
        };

        let remaining_distance_m = fix.and_then(|fix| self.cursor.remaining_distance_m(&fix));

        // the session is over once arrived: the report no longer evolves
        let health = match self.final_health {
            Some(health) => health,
            None => self.health(t),
        };

        if state.is_terminal() && self.final_health.is_none() {
            self.final_health = Some(health);
        }

        let healthy = health.is_healthy();

        if !self.closed && self.healthy != Some(healthy) {
            if healthy {
                info!("{} - tracking healthy ({})", t, health);
            } else {
                warn!("{} - tracking degraded ({})", t, health);
            }
            self.healthy = Some(healthy);
            events.push(Event::TrackingHealth(healthy));
        }

        Output {
            t,
            state,
            target,
            relative_bearing,
            heading,
            distance_m,
            remaining_distance_m,
            health,
            events,
        }
    }

    /// Releases every resource this session holds.
    /// Safe to call several times, and automatically called on drop.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        let released = self.resources.release_all();
        self.closed = true;
        info!("session closed: {} resource(s) released", released);
    }
}

impl<R: Router, N: NameResolver, H: Haptics> Drop for Wayfinder<R, N, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<R: Router, N: NameResolver, H: Haptics> std::fmt::Debug for Wayfinder<R, N, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wayfinder")
            .field("state", &self.detector.state())
            .field("target", &self.cursor.target())
            .field("fix", &self.location.latest_smoothed())
            .field("resources", &self.resources)
            .field("closed", &self.closed)
            .finish()
    }
}
