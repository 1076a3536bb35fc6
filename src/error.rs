use thiserror::Error;

use crate::{cfg::Error as ConfigError, prelude::Epoch};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The platform refused access to a sensor stream.
    /// The engine keeps running and reports degraded tracking.
    #[error("sensor permission denied")]
    PermissionDenied,

    /// The sensor stream did not deliver in time.
    #[error("sensor timeout")]
    SensorTimeout,

    /// Hardware is absent or the platform does not expose this stream.
    #[error("sensor unavailable")]
    SensorUnavailable,

    /// Fix coordinates are not finite or out of their domain.
    #[error("invalid fix coordinates")]
    InvalidCoordinates,

    /// Fixes must be presented in chronological order: a fix older
    /// than the previously accepted one is rejected.
    #[error("out of order fix: {0} is prior {1}")]
    OutOfOrderFix(Epoch, Epoch),

    /// Fix accuracy hint is worse than the configured tolerance.
    #[error("inaccurate fix: {0:.1}m")]
    InaccurateFix(f64),

    /// The routing collaborator failed to answer (network, backend..).
    /// Last known good target is retained and we will naturally retry
    /// on the next refresh.
    #[error("routing failure: {0}")]
    RoutingFailure(String),

    /// The routing collaborator returned a waypoint name that
    /// the name resolver does not know about.
    #[error("unresolved waypoint \"{0}\"")]
    UnresolvedWaypoint(String),

    /// A [Route] must contain at least one waypoint.
    #[error("empty route")]
    EmptyRoute,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Inputs presented after teardown are refused.
    #[error("session closed")]
    SessionClosed,
}

impl Error {
    /// True for errors that describe a sensor stream condition,
    /// as opposed to a rejected sample.
    pub fn is_sensor_condition(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied | Self::SensorTimeout | Self::SensorUnavailable
        )
    }
}
