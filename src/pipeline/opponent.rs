use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::pipeline::geo::distance_meters;
use crate::types::track::{SanitizedPoint, TrackPoint};

const SMOOTH_WINDOW: usize = 5;
const MIN_SPEED_MPS: f64 = 0.5;
/// Lower bound on the re-timing factor so an implausibly short target cannot collapse the track.
const MIN_SCALE: f64 = 0.1;
/// Longest target the HTTP surface accepts: one year.
pub const MAX_TARGET_DURATION_SECS: f64 = 365.0 * 24.0 * 3600.0;

/// Targets the HTTP surface accepts: finite and at most [`MAX_TARGET_DURATION_SECS`].
pub fn is_acceptable_target(target_duration_secs: f64) -> bool {
    target_duration_secs.is_finite() && target_duration_secs <= MAX_TARGET_DURATION_SECS
}

/// Base speed in km/h for a slope in percent. Steeper climbs are slower.
pub fn base_speed_kmh(slope_pct: f64) -> f64 {
    if slope_pct > 6.0 {
        10.0
    } else if slope_pct > 2.0 {
        12.0
    } else if slope_pct > -2.0 {
        14.0
    } else if slope_pct > -6.0 {
        16.0
    } else {
        18.0
    }
}

/// Builds a track along the reference geometry, re-timed to take
/// `target_duration_secs` with a slope-based pace. Returns `None` when the
/// reference is too short or has no length, or when the timestamps would
/// fall outside the representable date range.
pub fn generate_opponent(reference: &[SanitizedPoint], target_duration_secs: f64) -> Option<Vec<TrackPoint>> {
    let start = reference
        .first()
        .and_then(|p| p.time.as_deref())
        .and_then(|t| DateTime::parse_from_rfc3339(t.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    generate_opponent_from(reference, target_duration_secs, start)
}

pub fn generate_opponent_from(
    reference: &[SanitizedPoint],
    target_duration_secs: f64,
    start: DateTime<Utc>,
) -> Option<Vec<TrackPoint>> {
    if reference.len() < 2 {
        return None;
    }

    let segments: Vec<(f64, f64)> = reference
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let distance = distance_meters(a.lat, a.lon, b.lat, b.lon);
            let slope_pct = if distance > 0.0 {
                (b.elevation - a.elevation) / distance * 100.0
            } else {
                0.0
            };
            (distance, base_speed_kmh(slope_pct) / 3.6)
        })
        .collect();

    let half = SMOOTH_WINDOW / 2;
    let durations: Vec<f64> = (0..segments.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(segments.len());
            let avg = segments[lo..hi].iter().map(|(_, v)| v).sum::<f64>() / (hi - lo) as f64;
            segments[i].0 / avg.max(MIN_SPEED_MPS)
        })
        .collect();

    let total_base: f64 = durations.iter().sum();
    if !total_base.is_finite() || total_base <= 0.0 {
        tracing::debug!("Opponent generation skipped: base duration {}", total_base);
        return None;
    }
    let scale = (target_duration_secs / total_base).max(MIN_SCALE);

    let mut elapsed_secs = 0.0;
    let mut out = Vec::with_capacity(reference.len());
    for (i, point) in reference.iter().enumerate() {
        if i > 0 {
            elapsed_secs += durations[i - 1] * scale;
        }
        let elapsed_ms = (elapsed_secs * 1000.0).round();
        if !elapsed_ms.is_finite() || elapsed_ms.abs() >= i64::MAX as f64 {
            tracing::debug!("Opponent generation skipped: offset {} ms out of range", elapsed_ms);
            return None;
        }
        let at = TimeDelta::try_milliseconds(elapsed_ms as i64)
            .and_then(|offset| start.checked_add_signed(offset))?;
        out.push(TrackPoint {
            lat: point.lat,
            lon: point.lon,
            elevation: point.elevation,
            time: Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            heart_rate: None,
        });
    }
    Some(out)
}
