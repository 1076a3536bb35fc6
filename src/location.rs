//! Location sampling and smoothing
use std::collections::VecDeque;

use log::{debug, warn};
use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    geodesy::GeoPoint,
    prelude::{Config, Epoch},
};

/// [Fix] is a timestamped device location sample.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    /// Location
    pub point: GeoPoint,
    /// Capture [Epoch]
    pub t: Epoch,
    /// Accuracy hint (meters, 1 sigma), when the platform provides it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub accuracy_m: Option<f64>,
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.t, self.point)?;
        if let Some(accuracy_m) = self.accuracy_m {
            write!(f, " (±{:.1}m)", accuracy_m)?;
        }
        Ok(())
    }
}

impl Fix {
    /// Builds a new [Fix] without accuracy hint.
    pub fn new(t: Epoch, latitude: f64, longitude: f64) -> Self {
        Self {
            t,
            point: GeoPoint::new(latitude, longitude),
            accuracy_m: None,
        }
    }

    /// Copies and returns [Fix] with accuracy hint.
    pub fn with_accuracy_m(&self, accuracy_m: f64) -> Self {
        let mut s = *self;
        s.accuracy_m = Some(accuracy_m);
        s
    }
}

/// [LocationSampler] consumes the raw location stream and smoothes it
/// with an unweighted moving average over the latest fixes.
/// At pedestrian scale and for small windows, averaging the angles
/// directly is an acceptable approximation.
#[derive(Debug, Clone)]
pub struct LocationSampler {
    /// Smoothing window size
    window: usize,
    /// Optional accuracy gate (meters)
    max_accuracy_m: Option<f64>,
    /// Latest raw fixes, oldest first
    raw: VecDeque<Fix>,
    /// Latest smoothed [Fix]
    smoothed: Option<Fix>,
    /// Previous smoothed [Fix]
    previous: Option<Fix>,
    /// Stream condition, if it is currently failing
    stale: Option<Error>,
    /// Number of fixes accepted so far
    sequence: u64,
}

impl LocationSampler {
    /// Builds a new [LocationSampler] from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        let window = cfg.smoothing_window.max(1);
        Self {
            window,
            max_accuracy_m: cfg.max_fix_accuracy_m,
            raw: VecDeque::with_capacity(window),
            smoothed: None,
            previous: None,
            stale: None,
            sequence: 0,
        }
    }

    /// Push a new raw [Fix]. Returns the updated smoothed [Fix] on success.
    /// Rejected fixes do not modify the current state.
    pub fn push(&mut self, fix: Fix) -> Result<Fix, Error> {
        if !fix.point.is_valid() {
            return Err(Error::InvalidCoordinates);
        }

        if let Some(latest) = self.raw.back() {
            if fix.t < latest.t {
                return Err(Error::OutOfOrderFix(fix.t, latest.t));
            }
        }

        if let (Some(max_accuracy_m), Some(accuracy_m)) = (self.max_accuracy_m, fix.accuracy_m) {
            if accuracy_m > max_accuracy_m {
                return Err(Error::InaccurateFix(accuracy_m));
            }
        }

        if self.raw.len() == self.window {
            self.raw.pop_front();
        }

        self.raw.push_back(fix);

        let mean = self.raw.iter().map(|fix| fix.point.to_vector()).sum::<Vector2<f64>>()
            / self.raw.len() as f64;

        let smoothed = Fix {
            t: fix.t,
            point: GeoPoint::from(mean),
            accuracy_m: fix.accuracy_m,
        };

        if let Some(stale) = self.stale.take() {
            debug!("{} - location stream recovered from \"{}\"", fix.t, stale);
        }

        debug!("{} - smoothed fix {}", fix.t, smoothed.point);

        self.previous = self.smoothed.replace(smoothed);
        self.sequence += 1;

        Ok(smoothed)
    }

    /// Notify a location stream failure: [Self] is marked stale
    /// until the next accepted [Fix].
    pub fn on_error(&mut self, error: Error) {
        warn!("location stream failure: {}", error);
        self.stale = Some(error);
    }

    /// Latest smoothed [Fix], if any was ever accepted.
    pub fn latest_smoothed(&self) -> Option<Fix> {
        self.smoothed
    }

    /// Previous and latest smoothed [Fix]es, once two fixes were accepted.
    pub fn last_two(&self) -> Option<(Fix, Fix)> {
        Some((self.previous?, self.smoothed?))
    }

    /// True if the stream is currently reporting a failure.
    pub fn is_stale(&self) -> bool {
        self.stale.is_some()
    }

    /// Current stream failure, if any.
    pub fn stale_cause(&self) -> Option<&Error> {
        self.stale.as_ref()
    }

    /// Number of fixes accepted so far. Increases with every accepted [Fix],
    /// which lets the caller tell whether a new observation arrived.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
