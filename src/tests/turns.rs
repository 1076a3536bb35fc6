use crate::{
    prelude::{
        destination, Event, Fix, GeoPoint, NavigationState, Pulse, Route, Waypoint, Wayfinder,
    },
    tests::{at, compass, init_logger, raw_config, t0, MapResolver, NullRouter, RecordingHaptics},
};

const TARGET: GeoPoint = GeoPoint::new(12.0001, 77.0);

/// [Fix] 11m away from target, target lying at `bearing_deg`
fn around_target(s: f64, bearing_deg: f64) -> Fix {
    let point = destination(&TARGET, (bearing_deg + 180.0).to_radians(), 11.0);
    Fix::new(at(s), point.latitude, point.longitude)
}

#[test]
fn turn_alerts_are_rate_limited() {
    init_logger();

    let haptics = RecordingHaptics::default();
    let route = Route::new(vec![Waypoint::new("crossing", TARGET)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        haptics.clone(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(around_target(0.0, 0.0)).unwrap();
    assert_eq!(wayfinder.tick(at(0.0)).state, NavigationState::Navigating);

    // bearing to target keeps rotating by 20° every second
    let mut alerts = 0;
    for (s, bearing_deg) in [(1.0, 20.0), (2.0, 40.0), (3.0, 60.0), (4.0, 80.0)] {
        wayfinder.on_location(around_target(s, bearing_deg)).unwrap();
        let output = wayfinder.tick(at(s));
        assert_eq!(output.state, NavigationState::ApproachingTurn);
        if output.events.contains(&Event::TurnAlert) {
            alerts += 1;
        }
    }

    assert_eq!(alerts, 1);
    assert_eq!(haptics.pulses(), vec![Pulse::Short]);

    // 5s after the first alert
    wayfinder.on_location(around_target(6.0, 100.0)).unwrap();
    let output = wayfinder.tick(at(6.0));
    assert!(output.events.contains(&Event::TurnAlert));
    assert_eq!(haptics.count(Pulse::Short), 2);

    // bearing stabilized
    wayfinder.on_location(around_target(7.0, 101.0)).unwrap();
    let output = wayfinder.tick(at(7.0));
    assert_eq!(output.state, NavigationState::Navigating);
}

#[test]
fn render_ticks_do_not_advance_detection() {
    init_logger();

    let haptics = RecordingHaptics::default();
    let route = Route::new(vec![Waypoint::new("crossing", TARGET)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        haptics.clone(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(around_target(0.0, 0.0)).unwrap();
    wayfinder.tick(at(0.0));

    wayfinder.on_location(around_target(1.0, 30.0)).unwrap();
    let output = wayfinder.tick(at(1.0));
    assert!(output.events.contains(&Event::TurnAlert));

    // many frames, no new fix: the state is held
    for frame in 1..120 {
        let output = wayfinder.tick(at(1.0 + frame as f64 / 60.0));
        assert_eq!(output.state, NavigationState::ApproachingTurn);
        assert!(!output.events.contains(&Event::TurnAlert));
    }

    assert_eq!(haptics.count(Pulse::Short), 1);
}
