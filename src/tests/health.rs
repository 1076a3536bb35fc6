use crate::{
    prelude::{Error, Event, NavigationState, Route, Wayfinder},
    tests::{at, compass, fix, init_logger, raw_config, t0, MapResolver, NullRouter, RecordingHaptics},
};

fn health_events(events: &[Event]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TrackingHealth(healthy) => Some(*healthy),
            _ => None,
        })
        .collect()
}

#[test]
fn health_transitions() {
    init_logger();

    let route = Route::from_path(&[(12.001, 77.0)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        RecordingHaptics::default(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    // first evaluation is always reported
    let output = wayfinder.tick(at(0.0));
    assert!(!output.health.is_healthy());
    assert_eq!(health_events(&output.events), vec![false]);

    // no change: nothing reported
    let output = wayfinder.tick(at(0.1));
    assert!(health_events(&output.events).is_empty());

    wayfinder.on_location(fix(0.2, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(0.2));
    let output = wayfinder.tick(at(0.2));
    assert!(output.health.is_healthy());
    assert_eq!(health_events(&output.events), vec![true]);

    for i in 1..10 {
        let t = 0.2 + i as f64 * 0.1;
        wayfinder.on_video_frame(at(t));
        let output = wayfinder.tick(at(t));
        assert!(health_events(&output.events).is_empty());
    }

    // location stream failure
    wayfinder.on_location_error(Error::SensorTimeout);
    wayfinder.on_video_frame(at(1.5));
    let output = wayfinder.tick(at(1.5));
    assert!(!output.health.location);
    assert_eq!(health_events(&output.events), vec![false]);

    // recovered
    wayfinder.on_location(fix(2.0, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(2.0));
    let output = wayfinder.tick(at(2.0));
    assert_eq!(health_events(&output.events), vec![true]);
}

#[test]
fn frozen_video_stream() {
    init_logger();

    let route = Route::from_path(&[(12.001, 77.0)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        RecordingHaptics::default(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(fix(0.0, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(0.0));
    assert!(wayfinder.tick(at(0.0)).health.is_healthy());

    // last frame older than 2s
    wayfinder.on_location(fix(3.0, 12.0, 77.0)).unwrap();
    let output = wayfinder.tick(at(3.0));
    assert!(!output.health.video);
    assert_eq!(health_events(&output.events), vec![false]);
}

#[test]
fn denied_orientation_degrades_tracking() {
    init_logger();

    let route = Route::from_path(&[(12.001, 77.0)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        RecordingHaptics::default(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(fix(0.0, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(0.0));
    let output = wayfinder.tick(at(0.0));
    assert_eq!(health_events(&output.events), vec![true]);

    wayfinder.on_orientation_permission(false);
    wayfinder.on_video_frame(at(0.5));
    let output = wayfinder.tick(at(0.5));
    assert!(!output.health.orientation);
    assert!(output.health.location);
    assert_eq!(health_events(&output.events), vec![false]);

    // still navigating, on movement heading
    assert_eq!(output.state, NavigationState::Navigating);
}

#[test]
fn errors_other_than_sensor_conditions_are_ignored() {
    init_logger();

    let route = Route::from_path(&[(12.001, 77.0)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        RecordingHaptics::default(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(fix(0.0, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(0.0));
    assert!(wayfinder.tick(at(0.0)).health.is_healthy());

    wayfinder.on_location_error(Error::EmptyRoute);
    wayfinder.on_orientation_error(Error::RoutingFailure("unrelated".to_string()));
    wayfinder.on_video_frame(at(0.5));
    let output = wayfinder.tick(at(0.5));
    assert!(output.health.is_healthy());
    assert!(health_events(&output.events).is_empty());

    wayfinder.on_orientation_error(Error::SensorUnavailable);
    wayfinder.on_video_frame(at(1.0));
    let output = wayfinder.tick(at(1.0));
    assert!(!output.health.orientation);
    assert_eq!(health_events(&output.events), vec![false]);
}

#[test]
fn health_is_frozen_once_arrived() {
    init_logger();

    let route = Route::from_path(&[(12.0002, 77.0)]).unwrap();

    let mut wayfinder = Wayfinder::new(
        &raw_config(),
        &compass(),
        NullRouter::default(),
        MapResolver::default(),
        RecordingHaptics::default(),
        t0(),
    )
    .unwrap()
    .with_route(route);

    wayfinder.on_location(fix(0.0, 12.0, 77.0)).unwrap();
    wayfinder.on_video_frame(at(0.0));
    let output = wayfinder.tick(at(0.0));
    assert_eq!(health_events(&output.events), vec![true]);

    // 5.6m away
    wayfinder.on_location(fix(1.0, 12.00015, 77.0)).unwrap();
    wayfinder.on_video_frame(at(1.0));
    let output = wayfinder.tick(at(1.0));
    assert_eq!(output.state, NavigationState::Arrived);
    assert!(output.health.is_healthy());

    // camera released: no more frames, no more refresh
    for t in [3.0, 10.0, 20.0, 60.0] {
        let output = wayfinder.tick(at(t));
        assert!(output.health.is_healthy(), "t={}", t);
        assert!(health_events(&output.events).is_empty(), "t={}", t);
    }
}
