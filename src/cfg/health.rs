use crate::prelude::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_max_fix_age() -> Duration {
    Duration::from_seconds(10.0)
}

fn default_max_video_frame_age() -> Duration {
    Duration::from_seconds(2.0)
}

fn default_refresh_grace() -> Duration {
    Duration::from_seconds(15.0)
}

/// Freshness windows used by the tracking health assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HealthConfig {
    /// Latest fix older than this is no longer considered "received".
    #[cfg_attr(feature = "serde", serde(default = "default_max_fix_age"))]
    pub max_fix_age: Duration,
    /// The rendering collaborator must have produced a video frame
    /// within this window.
    #[cfg_attr(feature = "serde", serde(default = "default_max_video_frame_age"))]
    pub max_video_frame_age: Duration,
    /// Tolerated period without a successful routing refresh.
    /// Default value tolerates two missed refresh cycles.
    #[cfg_attr(feature = "serde", serde(default = "default_refresh_grace"))]
    pub refresh_grace: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_fix_age: default_max_fix_age(),
            max_video_frame_age: default_max_video_frame_age(),
            refresh_grace: default_refresh_grace(),
        }
    }
}

impl std::fmt::Display for HealthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "fix<{} video<{} refresh<{}",
            self.max_fix_age, self.max_video_frame_age, self.refresh_grace
        )
    }
}
