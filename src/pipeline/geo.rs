use crate::types::track::{LatLon, SanitizedPoint};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance in meters.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

pub fn distance_between(a: LatLon, b: LatLon) -> f64 {
    distance_meters(a.lat, a.lon, b.lat, b.lon)
}

pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0
}

/// Rounds to 6 decimal places (~0.11 m), which hides receiver jitter.
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Running distance along the points, starting at 0.
pub fn cumulative_distances(points: &[SanitizedPoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            total += distance_meters(prev.lat, prev.lon, point.lat, point.lon);
        }
        cumulative.push(total);
    }
    cumulative
}

pub fn lerp(a: LatLon, b: LatLon, t: f64) -> LatLon {
    if t.is_nan() || t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    LatLon::new(a.lat + (b.lat - a.lat) * t, a.lon + (b.lon - a.lon) * t)
}
