//! Tracking health assessment
use crate::{
    cfg::HealthConfig,
    prelude::{Duration, Epoch},
};

/// Freshness signals, sampled once per tick.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct HealthInputs {
    /// Latest accepted fix
    pub last_fix: Option<Epoch>,
    /// Location stream is currently failing
    pub location_stale: bool,
    /// Orientation is (or may become) available: permission
    /// was not denied and the stream is not failing.
    pub orientation_available: bool,
    /// Latest device heading
    pub last_heading: Option<Epoch>,
    /// Latest video frame produced by the rendering collaborator
    pub last_video_frame: Option<Epoch>,
    /// Latest successful routing refresh
    pub last_refresh: Option<Epoch>,
    /// Session start
    pub session_start: Epoch,
}

/// [HealthReport] gathers the assessment of each input.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// A recent fix was received
    pub location: bool,
    /// Orientation input is usable: permission was not denied
    /// and the stream is not failing.
    pub orientation: bool,
    /// A device heading was received. Informative only: the movement
    /// heading takes over while the orientation stream is silent.
    pub heading: bool,
    /// Video frames are flowing
    pub video: bool,
    /// Routing collaborator answered recently
    pub routing: bool,
}

impl HealthReport {
    /// Tracking is healthy when location, video and routing are all fresh
    /// and the orientation input is usable.
    /// Unhealthy tracking should switch the rendering collaborator to
    /// the compass-and-distance fallback.
    pub fn is_healthy(&self) -> bool {
        self.location && self.orientation && self.video && self.routing
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |ok: bool| if ok { "ok" } else { "ko" };
        write!(
            f,
            "location={} orientation={} heading={} video={} routing={}",
            flag(self.location),
            flag(self.orientation),
            flag(self.heading),
            flag(self.video),
            flag(self.routing)
        )
    }
}

fn is_fresh(now: Epoch, last: Option<Epoch>, max_age: Duration) -> bool {
    last.is_some_and(|last| now - last <= max_age)
}

/// Assesses tracking health at `now`. This is a pure function of the
/// freshness signals: it never modifies the navigation state.
pub fn assess(now: Epoch, inputs: &HealthInputs, cfg: &HealthConfig) -> HealthReport {
    let location = !inputs.location_stale && is_fresh(now, inputs.last_fix, cfg.max_fix_age);

    let video = is_fresh(now, inputs.last_video_frame, cfg.max_video_frame_age);

    // before the first answer, the grace window runs from session start
    let routing = match inputs.last_refresh {
        Some(last) => now - last <= cfg.refresh_grace,
        None => now - inputs.session_start <= cfg.refresh_grace,
    };

    let orientation = inputs.orientation_available;
    let heading = orientation && inputs.last_heading.is_some();

    HealthReport {
        location,
        orientation,
        heading,
        video,
        routing,
    }
}
