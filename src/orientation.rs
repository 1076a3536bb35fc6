//! Device orientation sampling
use log::{debug, warn};
use nalgebra::{Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::normalize_angle,
    prelude::{Epoch, OrientationSource},
};

/// Horizontal projections shorter than this mean the device
/// lies (almost) flat and the heading is undefined.
const MIN_HORIZONTAL_NORM: f64 = 1.0E-6;

/// Raw device attitude event, angles expressed in degrees.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttitudeEvent {
    /// Event [Epoch]
    pub t: Epoch,
    /// Platform provided compass heading, clockwise from true north.
    #[cfg_attr(feature = "serde", serde(default))]
    pub compass_heading: Option<f64>,
    /// Yaw: rotation about the Z axis (counter clockwise).
    #[cfg_attr(feature = "serde", serde(default))]
    pub alpha: Option<f64>,
    /// Pitch: rotation about the X axis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub beta: Option<f64>,
    /// Roll: rotation about the Y axis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gamma: Option<f64>,
    /// True when the attitude frame is referenced to true north.
    #[cfg_attr(feature = "serde", serde(default))]
    pub absolute: bool,
}

impl AttitudeEvent {
    /// Builds an [AttitudeEvent] carrying a compass heading (degrees).
    pub fn compass(t: Epoch, heading_deg: f64) -> Self {
        Self {
            t,
            compass_heading: Some(heading_deg),
            ..Default::default()
        }
    }

    /// Builds an [AttitudeEvent] from yaw, pitch and roll (degrees).
    pub fn euler(t: Epoch, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            t,
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            ..Default::default()
        }
    }

    /// Copies and returns [AttitudeEvent] marked as north referenced.
    pub fn with_absolute(&self) -> Self {
        let mut s = *self;
        s.absolute = true;
        s
    }
}

/// Device heading sample
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingSample {
    /// Heading (rad) within [0, 2π), 0 being true north
    pub radians: f64,
    /// Sampling [Epoch]
    pub t: Epoch,
}

/// Orientation permission handshake
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Permission {
    /// Waiting for the user to answer
    Pending,
    /// Events may flow
    Granted,
    /// Orientation will never be available in this session
    Denied,
}

/// Heading from the platform compass field, or from an
/// absolute attitude event: yaw is counter clockwise while
/// the heading is clockwise.
fn direct_heading(event: &AttitudeEvent) -> Option<f64> {
    let degrees = match (event.compass_heading, event.alpha) {
        (Some(heading), _) => heading,
        (None, Some(alpha)) if event.absolute => 360.0 - alpha,
        _ => return None,
    };
    if degrees.is_finite() {
        Some(normalize_angle(degrees.to_radians()))
    } else {
        None
    }
}

/// Heading reconstructed from yaw, pitch and roll.
/// The attitude is the intrinsic Z-X'-Y'' rotation, the heading
/// is the bearing of the horizontal projection of -Z (the direction
/// the back camera looks at).
fn reconstructed_heading(event: &AttitudeEvent) -> Option<f64> {
    let (alpha, beta, gamma) = (
        event.alpha?.to_radians(),
        event.beta?.to_radians(),
        event.gamma?.to_radians(),
    );

    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), alpha)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), beta)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), gamma);

    let v = -(rotation * Vector3::z());
    let (vx, vy) = (v[0], v[1]);

    if !vx.is_finite() || !vy.is_finite() || vx.hypot(vy) < MIN_HORIZONTAL_NORM {
        return None;
    }

    // atan2 applies the quadrant corrections of atan(vx/vy)
    Some(normalize_angle(vx.atan2(vy)))
}

/// [OrientationSampler] records the latest device heading.
/// It never blocks and does not retain any history.
#[derive(Debug, Clone)]
pub struct OrientationSampler {
    /// Selected [OrientationSource]
    source: OrientationSource,
    /// Permission handshake status
    permission: Permission,
    /// Latest [HeadingSample]
    latest: Option<HeadingSample>,
    /// Stream condition, if it is currently failing
    failure: Option<Error>,
}

impl OrientationSampler {
    /// Builds a new [OrientationSampler] using desired [OrientationSource].
    /// When the platform requires a one-time permission grant,
    /// events are ignored until [Self::on_permission] is called.
    pub fn new(source: OrientationSource, requires_permission: bool) -> Self {
        Self {
            source,
            latest: None,
            failure: None,
            permission: if requires_permission {
                Permission::Pending
            } else {
                Permission::Granted
            },
        }
    }

    /// Selected [OrientationSource]
    pub fn source(&self) -> OrientationSource {
        self.source
    }

    /// Current [Permission] status
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Answer to the permission handshake.
    pub fn on_permission(&mut self, granted: bool) {
        if granted {
            debug!("orientation permission granted");
            self.permission = Permission::Granted;
            self.failure = None;
        } else {
            warn!("orientation permission denied");
            self.permission = Permission::Denied;
            self.failure = Some(Error::PermissionDenied);
        }
    }

    /// Notify an orientation stream failure.
    pub fn on_error(&mut self, error: Error) {
        warn!("orientation stream failure: {}", error);
        self.failure = Some(error);
    }

    /// Record a new [AttitudeEvent]. Returns the resulting [HeadingSample],
    /// or None when this event does not define a heading.
    pub fn push(&mut self, event: &AttitudeEvent) -> Option<HeadingSample> {
        if self.permission != Permission::Granted {
            return None;
        }

        let radians = match self.source {
            OrientationSource::Direct => direct_heading(event),
            OrientationSource::Reconstructed => reconstructed_heading(event),
        }?;

        let sample = HeadingSample {
            radians,
            t: event.t,
        };

        self.failure = None;
        self.latest = Some(sample);
        Some(sample)
    }

    /// Latest heading, or None if no event defined one yet.
    pub fn latest(&self) -> Option<HeadingSample> {
        self.latest
    }

    /// True when orientation may be (or become) available.
    pub fn is_available(&self) -> bool {
        self.permission != Permission::Denied && self.failure.is_none()
    }
}
