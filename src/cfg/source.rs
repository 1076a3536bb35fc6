use crate::cfg::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Platform capabilities, as reported by the host at setup time.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Capabilities {
    /// Orientation events carry a compass heading field,
    /// or the platform emits absolute (north referenced) attitude.
    pub compass_heading: bool,
    /// Orientation events carry yaw, pitch and roll angles.
    pub euler_angles: bool,
    /// Orientation events will only arrive after an explicit
    /// one-time permission grant.
    pub requires_permission: bool,
}

/// How the device heading is acquired from attitude events.
/// Selected once at setup and never re-detected per event.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrientationSource {
    /// Platform provided compass heading, used as is.
    /// This is our prefered source: the platform already compensated tilt.
    #[cfg_attr(feature = "serde", serde(alias = "direct", alias = "Direct"))]
    #[default]
    Direct,

    /// Heading reconstructed from yaw, pitch and roll,
    /// by projecting the device forward vector onto the horizontal plane.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "reconstructed", alias = "Reconstructed")
    )]
    Reconstructed,
}

impl OrientationSource {
    /// Selects the [OrientationSource] matching these [Capabilities].
    /// The platform compass is prefered whenever it exists.
    pub fn select(capabilities: &Capabilities) -> Self {
        if capabilities.compass_heading || !capabilities.euler_angles {
            Self::Direct
        } else {
            Self::Reconstructed
        }
    }
}

impl std::fmt::Display for OrientationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Reconstructed => write!(f, "reconstructed"),
        }
    }
}

impl std::str::FromStr for OrientationSource {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "compass" => Ok(Self::Direct),
            "reconstructed" | "euler" => Ok(Self::Reconstructed),
            _ => Err(Error::InvalidOrientationSource),
        }
    }
}
