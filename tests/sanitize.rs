use trackreplay_rs::pipeline::sanitize::{parse_time_ms, sanitize, FALLBACK_UNIFORM_SPEED_MPS};
use trackreplay_rs::types::track::TrackPoint;

mod common;

#[test]
fn clean_track_passes_through_unchanged() {
    let raw = common::straight_track(20, 40.0, 10);
    let result = sanitize(&raw);

    assert!(!result.synthetic_timing);
    assert_eq!(result.points.len(), raw.len());
    for (kept, original) in result.points.iter().zip(&raw) {
        assert_eq!(kept.lat, original.lat);
        assert_eq!(kept.lon, original.lon);
        assert_eq!(kept.time, original.time);
        assert_eq!(Some(kept.t), parse_time_ms(original.time.as_deref()));
    }
}

#[test]
fn impossible_jump_drops_only_that_point() {
    let mut raw = common::straight_track(10, 40.0, 1);
    // ~1000 km north within one second.
    raw[4].lat += 9.0;

    let result = sanitize(&raw);

    assert_eq!(result.points.len(), 9);
    let kept_times: Vec<_> = result.points.iter().map(|p| p.time.clone()).collect();
    let expected: Vec<_> = raw
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4)
        .map(|(_, p)| p.time.clone())
        .collect();
    assert_eq!(kept_times, expected);
}

#[test]
fn unsorted_timestamps_are_sorted() {
    let mut raw = common::straight_track(6, 30.0, 10);
    raw.swap(1, 4);
    raw.swap(0, 5);

    let result = sanitize(&raw);

    assert_eq!(result.points.len(), 6);
    assert!(result.points.windows(2).all(|w| w[0].t <= w[1].t));
}

#[test]
fn identical_timestamps_are_kept() {
    let mut raw = common::straight_track(4, 30.0, 10);
    raw[2].time = raw[1].time.clone();

    let result = sanitize(&raw);

    assert_eq!(result.points.len(), 4);
    assert_eq!(result.points[1].t, result.points[2].t);
}

#[test]
fn invalid_coordinates_are_discarded() {
    let mut raw = common::straight_track(5, 30.0, 10);
    raw[1].lat = 95.0;
    raw[3].lon = f64::NAN;

    let result = sanitize(&raw);

    assert_eq!(result.points.len(), 3);
}

#[test]
fn missing_timestamps_fall_back_to_uniform_pace() {
    let mut raw = common::straight_track(8, 50.0, 10);
    for point in raw.iter_mut().skip(1) {
        point.time = None;
    }

    let result = sanitize(&raw);

    assert!(result.synthetic_timing);
    assert_eq!(result.points.len(), 8);
    assert_eq!(result.points[0].t, 0);
    assert!(result.points.windows(2).all(|w| w[0].t <= w[1].t));
    let expected_last = (7.0 * 50.0 / FALLBACK_UNIFORM_SPEED_MPS * 1000.0) as i64;
    assert!((result.points[7].t - expected_last).abs() <= 1);
}

#[test]
fn unparsable_timestamps_count_as_missing() {
    let raw: Vec<TrackPoint> = common::straight_track(3, 50.0, 10)
        .into_iter()
        .map(|p| TrackPoint {
            time: Some("yesterday-ish".to_string()),
            ..p
        })
        .collect();

    let result = sanitize(&raw);

    assert!(result.synthetic_timing);
    assert_eq!(result.points[0].t, 0);
}

#[test]
fn fewer_than_two_valid_points_yield_empty_series() {
    assert!(sanitize(&[]).points.is_empty());

    let single = common::straight_track(1, 0.0, 0);
    assert!(sanitize(&single).points.is_empty());

    let mut one_valid = common::straight_track(3, 10.0, 10);
    one_valid[1].lat = -120.0;
    one_valid[2].lon = 400.0;
    for p in &mut one_valid {
        p.time = None;
    }
    let result = sanitize(&one_valid);
    assert!(result.points.is_empty());
    assert!(!result.synthetic_timing);
}
