use chrono::DateTime;

use crate::pipeline::geo::{distance_meters, is_valid_coordinate, round_coordinate};
use crate::types::track::{SanitizedPoint, TrackPoint};

/// Anything faster than this between two kept fixes is treated as a corrupt fix (~162 km/h).
pub const MAX_REASONABLE_SPEED_MPS: f64 = 45.0;
/// Pace used to invent a timeline for tracks without usable timestamps.
pub const FALLBACK_UNIFORM_SPEED_MPS: f64 = 5.0;

#[derive(Debug, Clone, Default)]
pub struct Sanitized {
    pub points: Vec<SanitizedPoint>,
    /// Set when the timeline was synthesized from distance instead of timestamps.
    pub synthetic_timing: bool,
}

pub fn sanitize(raw: &[TrackPoint]) -> Sanitized {
    let valid: Vec<TrackPoint> = raw
        .iter()
        .map(|p| TrackPoint {
            lat: round_coordinate(p.lat),
            lon: round_coordinate(p.lon),
            ..p.clone()
        })
        .filter(|p| is_valid_coordinate(p.lat, p.lon))
        .collect();

    let mut timed: Vec<SanitizedPoint> = valid
        .iter()
        .filter_map(|p| parse_time_ms(p.time.as_deref()).map(|t| SanitizedPoint::from_raw(p, t)))
        .collect();

    if timed.len() >= 2 {
        // Stable sort keeps source order for equal timestamps.
        timed.sort_by_key(|p| p.t);
        return Sanitized {
            points: drop_impossible_jumps(timed),
            synthetic_timing: false,
        };
    }

    if valid.len() < 2 {
        return Sanitized::default();
    }

    tracing::debug!(
        "Only {} timestamped points out of {}, synthesizing timeline",
        timed.len(),
        valid.len()
    );

    Sanitized {
        points: synthesize_timeline(&valid),
        synthetic_timing: true,
    }
}

pub fn parse_time_ms(time: Option<&str>) -> Option<i64> {
    let text = time?.trim();
    if text.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

fn drop_impossible_jumps(sorted: Vec<SanitizedPoint>) -> Vec<SanitizedPoint> {
    let mut kept: Vec<SanitizedPoint> = Vec::with_capacity(sorted.len());
    for point in sorted {
        let Some(last) = kept.last() else {
            kept.push(point);
            continue;
        };
        let elapsed_secs = (point.t - last.t) as f64 / 1000.0;
        let speed = if elapsed_secs > 0.0 {
            distance_meters(last.lat, last.lon, point.lat, point.lon) / elapsed_secs
        } else {
            0.0
        };
        if speed <= MAX_REASONABLE_SPEED_MPS {
            kept.push(point);
        }
    }
    kept
}

fn synthesize_timeline(points: &[TrackPoint]) -> Vec<SanitizedPoint> {
    let mut elapsed_ms = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            let distance = distance_meters(prev.lat, prev.lon, point.lat, point.lon);
            elapsed_ms += distance / FALLBACK_UNIFORM_SPEED_MPS * 1000.0;
        }
        out.push(SanitizedPoint::from_raw(point, elapsed_ms.round() as i64));
    }
    out
}
