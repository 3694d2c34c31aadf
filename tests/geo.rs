use trackreplay_rs::pipeline::geo::{
    cumulative_distances, distance_meters, is_valid_coordinate, round_coordinate,
};

mod common;

#[test]
fn distance_is_zero_for_identical_points() {
    for (lat, lon) in [(0.0, 0.0), (46.5, 7.25), (-33.9, 151.2), (89.9, -179.9)] {
        assert_eq!(distance_meters(lat, lon, lat, lon), 0.0);
    }
}

#[test]
fn distance_is_symmetric() {
    let pairs = [
        ((52.52, 13.405), (48.8566, 2.3522)),
        ((-33.9, 151.2), (40.7128, -74.006)),
        ((0.0, 179.9), (0.0, -179.9)),
    ];
    for ((lat1, lon1), (lat2, lon2)) in pairs {
        assert_eq!(
            distance_meters(lat1, lon1, lat2, lon2),
            distance_meters(lat2, lon2, lat1, lon1)
        );
    }
}

#[test]
fn one_degree_of_latitude_matches_sphere_radius() {
    let d = distance_meters(10.0, 20.0, 11.0, 20.0);
    assert!((d - common::METERS_PER_DEG_LAT).abs() < 0.01, "got {d}");
}

#[test]
fn coordinate_validation_rejects_out_of_range_and_non_finite() {
    assert!(is_valid_coordinate(90.0, 180.0));
    assert!(is_valid_coordinate(-90.0, -180.0));
    assert!(!is_valid_coordinate(90.000001, 0.0));
    assert!(!is_valid_coordinate(0.0, -180.5));
    assert!(!is_valid_coordinate(f64::NAN, 0.0));
    assert!(!is_valid_coordinate(0.0, f64::INFINITY));
}

#[test]
fn rounding_keeps_six_decimals() {
    assert_eq!(round_coordinate(46.12345678), 46.123457);
    assert_eq!(round_coordinate(-7.0000004), -7.0);
}

#[test]
fn cumulative_distance_starts_at_zero_and_never_decreases() {
    let points = common::moving_points(&[0, 1000, 2000, 3000], 25.0);
    let cumulative = cumulative_distances(&points);
    assert_eq!(cumulative.len(), points.len());
    assert_eq!(cumulative[0], 0.0);
    assert!(cumulative.windows(2).all(|w| w[1] >= w[0]));
    assert!((cumulative[3] - 75.0).abs() < 0.01);
}
