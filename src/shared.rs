//! Engine shared between the platform callbacks
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    engine::Wayfinder,
    error::Error,
    haptics::Haptics,
    location::Fix,
    orientation::{AttitudeEvent, HeadingSample},
    output::Output,
    prelude::Epoch,
    route::RefreshOutcome,
    routing::{NameResolver, Router},
};

/// [SharedWayfinder] lets the location, orientation and render
/// callbacks of the host platform drive a single [Wayfinder].
/// Each entry point holds the lock for a single update only.
pub struct SharedWayfinder<R: Router, N: NameResolver, H: Haptics> {
    inner: Arc<Mutex<Wayfinder<R, N, H>>>,
}

impl<R: Router, N: NameResolver, H: Haptics> Clone for SharedWayfinder<R, N, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Router, N: NameResolver, H: Haptics> From<Wayfinder<R, N, H>> for SharedWayfinder<R, N, H> {
    fn from(wayfinder: Wayfinder<R, N, H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(wayfinder)),
        }
    }
}

impl<R: Router, N: NameResolver, H: Haptics> SharedWayfinder<R, N, H> {
    /// Locks the inner [Wayfinder]. A panic in another callback
    /// does not prevent the session from being torn down.
    pub fn lock(&self) -> MutexGuard<'_, Wayfinder<R, N, H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [Wayfinder::on_location]
    pub fn on_location(&self, fix: Fix) -> Result<Fix, Error> {
        self.lock().on_location(fix)
    }

    /// See [Wayfinder::on_location_error]
    pub fn on_location_error(&self, error: Error) {
        self.lock().on_location_error(error)
    }

    /// See [Wayfinder::on_attitude]
    pub fn on_attitude(&self, event: &AttitudeEvent) -> Option<HeadingSample> {
        self.lock().on_attitude(event)
    }

    /// See [Wayfinder::on_orientation_permission]
    pub fn on_orientation_permission(&self, granted: bool) {
        self.lock().on_orientation_permission(granted)
    }

    /// See [Wayfinder::on_orientation_error]
    pub fn on_orientation_error(&self, error: Error) {
        self.lock().on_orientation_error(error)
    }

    /// See [Wayfinder::on_video_frame]
    pub fn on_video_frame(&self, t: Epoch) {
        self.lock().on_video_frame(t)
    }

    /// See [Wayfinder::refresh]
    pub fn refresh(&self, t: Epoch) -> Result<RefreshOutcome, Error> {
        self.lock().refresh(t)
    }

    /// See [Wayfinder::tick]
    pub fn tick(&self, t: Epoch) -> Output {
        self.lock().tick(t)
    }

    /// See [Wayfinder::teardown]
    pub fn teardown(&self) {
        self.lock().teardown()
    }
}
