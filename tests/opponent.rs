use chrono::{DateTime, Utc};
use trackreplay_rs::pipeline::opponent::{base_speed_kmh, generate_opponent, is_acceptable_target};
use trackreplay_rs::pipeline::sanitize::sanitize;
use trackreplay_rs::types::track::SanitizedPoint;

mod common;

fn reference() -> Vec<SanitizedPoint> {
    sanitize(&common::straight_track(50, 100.0, 20)).points
}

fn time_of(point: &trackreplay_rs::types::track::TrackPoint) -> DateTime<Utc> {
    point
        .time
        .as_deref()
        .expect("timestamp")
        .parse()
        .expect("rfc3339")
}

#[test]
fn flat_track_lasts_exactly_the_target() {
    let reference = reference();
    for target in [600.0, 2700.0, 7200.0] {
        let opponent = generate_opponent(&reference, target).expect("opponent");

        assert_eq!(opponent.len(), reference.len());
        let first = time_of(&opponent[0]);
        let last = time_of(opponent.last().expect("last"));
        assert_eq!(first, common::base_time());
        let elapsed_ms = (last - first).num_milliseconds();
        assert!((elapsed_ms - (target * 1000.0) as i64).abs() <= 2, "target {target}: {elapsed_ms}");
    }
}

#[test]
fn geometry_is_kept_and_heart_rate_dropped() {
    let mut reference = reference();
    for p in &mut reference {
        p.heart_rate = Some(150);
    }
    let opponent = generate_opponent(&reference, 1800.0).expect("opponent");

    for (a, b) in opponent.iter().zip(&reference) {
        assert_eq!((a.lat, a.lon, a.elevation), (b.lat, b.lon, b.elevation));
        assert_eq!(a.heart_rate, None);
    }
}

#[test]
fn climbs_take_longer_than_descents() {
    // Two halves of equal length: first climbs 8%, second descends 8%.
    let mut reference = sanitize(&common::straight_track(41, 50.0, 10)).points;
    for (i, p) in reference.iter_mut().enumerate() {
        p.elevation = if i <= 20 { i as f64 * 4.0 } else { (40 - i) as f64 * 4.0 };
    }
    let opponent = generate_opponent(&reference, 1000.0).expect("opponent");

    let start = time_of(&opponent[0]);
    let mid = time_of(&opponent[20]);
    let end = time_of(&opponent[40]);
    assert!((mid - start) > (end - mid));
}

#[test]
fn slope_buckets_are_strict() {
    assert_eq!(base_speed_kmh(6.5), 10.0);
    assert_eq!(base_speed_kmh(6.0), 12.0);
    assert_eq!(base_speed_kmh(2.0), 14.0);
    assert_eq!(base_speed_kmh(0.0), 14.0);
    assert_eq!(base_speed_kmh(-2.0), 16.0);
    assert_eq!(base_speed_kmh(-6.0), 18.0);
    assert_eq!(base_speed_kmh(-15.0), 18.0);
}

#[test]
fn degenerate_references_produce_nothing() {
    let reference = reference();
    assert!(generate_opponent(&reference[..1], 600.0).is_none());
    assert!(generate_opponent(&[], 600.0).is_none());

    let parked: Vec<SanitizedPoint> = (0..5).map(|i| common::sp(46.5, 7.25, i * 1000)).collect();
    assert!(generate_opponent(&parked, 600.0).is_none());
}

#[test]
fn missing_start_time_still_produces_a_track() {
    let mut reference = reference();
    reference[0].time = None;
    let opponent = generate_opponent(&reference, 600.0).expect("opponent");
    assert!(opponent.iter().all(|p| p.time.is_some()));
}

#[test]
fn targets_beyond_the_calendar_yield_nothing() {
    let reference = reference();

    for target in [1e13, 1e300, f64::INFINITY] {
        assert!(generate_opponent(&reference, target).is_none(), "target {target}");
    }
    assert!(!is_acceptable_target(1e13));
    assert!(!is_acceptable_target(f64::NAN));
    assert!(is_acceptable_target(3600.0));
}
