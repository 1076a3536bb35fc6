#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod detector;
mod engine;
mod error;
mod fusion;
mod geodesy;
mod haptics;
mod health;
mod location;
mod orientation;
mod output;
mod route;
mod routing;
mod session;
mod shared;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Capabilities, Config, HealthConfig, OrientationSource};
    pub use crate::detector::{Event, NavigationState};
    pub use crate::engine::Wayfinder;
    pub use crate::error::Error;
    pub use crate::fusion::{FusedHeading, HeadingOrigin};
    pub use crate::geodesy::{
        angle_difference, bearing, destination, distance, normalize_angle, signed_angle, GeoPoint,
    };
    pub use crate::haptics::{Haptics, NullHaptics, Pulse};
    pub use crate::health::HealthReport;
    pub use crate::location::Fix;
    pub use crate::orientation::{AttitudeEvent, HeadingSample, Permission};
    pub use crate::output::{Output, RelativeBearing};
    pub use crate::route::{RefreshOutcome, Route, Waypoint};
    pub use crate::routing::{FixedRoute, NameResolver, NullResolver, RouteUpdate, Router};
    pub use crate::session::{Resource, ResourceKind};
    pub use crate::shared::SharedWayfinder;
    // re-export
    pub use hifitime::{Duration, Epoch};
}

// pub export
pub use error::Error;
pub use cfg::Error as ConfigError;
