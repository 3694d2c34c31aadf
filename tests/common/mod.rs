#![allow(dead_code)]

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use trackreplay_rs::types::track::{SanitizedPoint, TrackPoint, TrackSource};

/// Meters per degree of latitude on the haversine sphere.
pub const METERS_PER_DEG_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

pub const BASE_LAT: f64 = 46.5;
pub const BASE_LON: f64 = 7.25;

pub fn base_time() -> DateTime<Utc> {
    "2026-01-01T08:00:00Z".parse().expect("base time")
}

pub fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Northbound straight line, `count` points, `step_m` apart, `step_secs` apart.
pub fn straight_track(count: usize, step_m: f64, step_secs: i64) -> Vec<TrackPoint> {
    (0..count)
        .map(|i| {
            let lat = round6(BASE_LAT + i as f64 * step_m / METERS_PER_DEG_LAT);
            let at = base_time() + Duration::seconds(i as i64 * step_secs);
            TrackPoint::new(lat, BASE_LON, 0.0, Some(iso(at)))
        })
        .collect()
}

pub fn source(name: &str, points: Vec<TrackPoint>) -> TrackSource {
    TrackSource {
        name: name.to_string(),
        color: "#FF3366".to_string(),
        points,
    }
}

pub fn sp(lat: f64, lon: f64, t: i64) -> SanitizedPoint {
    SanitizedPoint {
        lat,
        lon,
        elevation: 0.0,
        time: None,
        heart_rate: None,
        t,
    }
}

/// Sanitized points moving north `step_m` per point, with explicit times in ms.
pub fn moving_points(times_ms: &[i64], step_m: f64) -> Vec<SanitizedPoint> {
    times_ms
        .iter()
        .enumerate()
        .map(|(i, t)| sp(BASE_LAT + i as f64 * step_m / METERS_PER_DEG_LAT, BASE_LON, *t))
        .collect()
}
