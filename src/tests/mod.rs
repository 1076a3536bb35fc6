
mod health;
mod turns;

pub use doubles::*;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{Capabilities, Config, Duration, Epoch, Fix};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Session start, shared by all scenarios
pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2025, 3, 1)
}

/// [Epoch] `s` seconds into the session
pub fn at(s: f64) -> Epoch {
    t0() + Duration::from_seconds(s)
}

/// [Fix] `s` seconds into the session
pub fn fix(s: f64, latitude: f64, longitude: f64) -> Fix {
    Fix::new(at(s), latitude, longitude)
}

/// Platform with a compass
pub fn compass() -> Capabilities {
    Capabilities {
        compass_heading: true,
        ..Default::default()
    }
}

/// Unsmoothed [Config], so each fix is an observation of its own.
pub fn raw_config() -> Config {
    Config::default().with_smoothing_window(1)
}
