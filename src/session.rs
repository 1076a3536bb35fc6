//! Session resources
use std::collections::BTreeMap;

use log::debug;

/// Kind of resource a session holds on the platform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// Location stream subscription
    LocationWatch,
    /// Orientation stream subscription
    OrientationListener,
    /// Routing refresh timer
    RefreshTimer,
    /// Camera stream
    Camera,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocationWatch => write!(f, "location-watch"),
            Self::OrientationListener => write!(f, "orientation-listener"),
            Self::RefreshTimer => write!(f, "refresh-timer"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

/// Anything the host platform must be told to release:
/// subscriptions, timers, media streams.
pub trait Resource {
    /// Releases this resource. Called at most once.
    fn release(&mut self);
}

/// Resources held by a session, released at most once each.
#[derive(Default)]
pub(crate) struct Resources {
    held: BTreeMap<ResourceKind, Box<dyn Resource + Send>>,
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.held.keys()).finish()
    }
}

impl Resources {
    /// Starts holding a resource. A previously held resource
    /// of the same kind is released first.
    pub fn attach(&mut self, kind: ResourceKind, resource: Box<dyn Resource + Send>) {
        if let Some(mut previous) = self.held.insert(kind, resource) {
            debug!("replacing {}", kind);
            previous.release();
        }
    }

    /// Releases resource of this kind. Returns false if it was not held.
    pub fn release(&mut self, kind: ResourceKind) -> bool {
        match self.held.remove(&kind) {
            Some(mut resource) => {
                debug!("releasing {}", kind);
                resource.release();
                true
            },
            None => false,
        }
    }

    /// Releases everything. Returns the number of released resources.
    pub fn release_all(&mut self) -> usize {
        let held = std::mem::take(&mut self.held);
        let count = held.len();
        for (kind, mut resource) in held {
            debug!("releasing {}", kind);
            resource.release();
        }
        count
    }

    pub fn is_held(&self, kind: ResourceKind) -> bool {
        self.held.contains_key(&kind)
    }
}
