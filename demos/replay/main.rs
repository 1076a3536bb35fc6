// Replays a recorded walk: fixes and compass headings are presented to the
// engine in chronological order, and the engine is ticked at the frame rate
// of the (absent) rendering collaborator.
#[macro_use]
extern crate log;

use env_logger::{Builder, Target};

mod cli;
use cli::Cli;

pub mod setup;

use wayfinder::prelude::{
    Duration, Epoch, Event, FixedRoute, Haptics, NavigationState, NullResolver, Pulse,
    Wayfinder,
};

// Haptic feedback, printed to the console
struct Console {}

impl Haptics for Console {
    fn pulse(&mut self, pulse: Pulse) {
        info!("bzz ({} - {}ms)", pulse, pulse.duration_ms());
    }
}

pub fn main() {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let scenario = cli.scenario();

    let t0 = Epoch::from_gregorian_utc_at_midnight(2025, 3, 1);
    let route = scenario.route();

    info!(
        "replaying {} fixes along {} waypoints ({:.1}m)",
        scenario.fixes.len(),
        route.len(),
        route.length_m()
    );

    let mut wayfinder = Wayfinder::new(
        &scenario.cfg,
        &scenario.capabilities,
        FixedRoute::new(route),
        NullResolver::default(),
        Console {},
        t0,
    )
    .unwrap_or_else(|e| panic!("failed to deploy: {}", e));

    if scenario.capabilities.requires_permission {
        wayfinder.on_orientation_permission(true);
    }

    let frame_period = Duration::from_seconds(1.0 / scenario.frame_rate_hz);
    let end = t0 + Duration::from_seconds(scenario.duration_s());

    let (mut next_fix, mut next_heading) = (0, 0);
    let (mut turns, mut arrived) = (0, false);

    let mut t = t0;

    while t < end {
        while let Some(fix) = scenario.fix(t0, next_fix) {
            if fix.t > t {
                break;
            }
            if let Err(e) = wayfinder.on_location(fix) {
                warn!("{} - {}", fix.t, e);
            }
            next_fix += 1;
        }

        while let Some(event) = scenario.attitude(t0, next_heading) {
            if event.t > t {
                break;
            }
            wayfinder.on_attitude(&event);
            next_heading += 1;
        }

        wayfinder.on_video_frame(t);

        let output = wayfinder.tick(t);

        for event in output.events.iter() {
            match event {
                Event::TurnAlert => turns += 1,
                Event::Arrived => arrived = true,
                Event::TrackingHealth(_) => {},
            }
        }

        if !cli.quiet() || !output.events.is_empty() {
            println!("{}", output);
        }

        if output.state == NavigationState::Arrived && next_fix == scenario.fixes.len() {
            break;
        }

        t += frame_period;
    }

    wayfinder.teardown();

    println!(
        "{} turn alert(s), {}",
        turns,
        if arrived { "arrived" } else { "not arrived" }
    );

    if scenario.validation.expect_arrival && !arrived {
        panic!("TEST FAILED: destination was never reached");
    }
}
