use serde::Serialize;

use crate::pipeline::geo::{cumulative_distances, lerp};
use crate::types::track::{LatLon, SanitizedPoint};

/// Flat tracks still get a 1 m elevation range.
const MIN_ELEVATION_RANGE_M: f64 = 1.0;
const GRID_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub initial_elevation: f64,
    pub max_elevation: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElevationProfile {
    pub width: f64,
    pub height: f64,
    pub points: Vec<ProfilePoint>,
    /// SVG `points` attribute for a polyline.
    pub polyline: String,
    pub grid_lines: Vec<f64>,
    pub stats: ProfileStats,
}

/// Where a scrub ratio lands on the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileCursor {
    pub position: LatLon,
    pub elevation: f64,
    pub distance_m: f64,
}

/// Maps cumulative distance to x and elevation to y (inverted, lowest at the bottom).
pub fn build_profile(points: &[SanitizedPoint], width: f64, height: f64) -> Option<ElevationProfile> {
    if points.is_empty() {
        return None;
    }

    let cumulative = cumulative_distances(points);
    let total = cumulative.last().copied().unwrap_or(0.0);
    let min_ele = points.iter().map(|p| p.elevation).fold(f64::INFINITY, f64::min);
    let max_ele = points.iter().map(|p| p.elevation).fold(f64::NEG_INFINITY, f64::max);
    let range = (max_ele - min_ele).max(MIN_ELEVATION_RANGE_M);
    let last_idx = points.len().saturating_sub(1).max(1) as f64;

    let profile_points: Vec<ProfilePoint> = points
        .iter()
        .zip(&cumulative)
        .enumerate()
        .map(|(idx, (point, dist))| {
            let ratio = if total > 0.0 {
                dist / total
            } else {
                idx as f64 / last_idx
            };
            ProfilePoint {
                x: ratio * width,
                y: height - (point.elevation - min_ele) / range * height,
            }
        })
        .collect();

    let polyline = profile_points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");

    let grid_lines = (1..=GRID_LINES)
        .map(|i| height * i as f64 / (GRID_LINES + 1) as f64)
        .collect();

    Some(ElevationProfile {
        width,
        height,
        points: profile_points,
        polyline,
        grid_lines,
        stats: ProfileStats {
            initial_elevation: points[0].elevation,
            max_elevation: max_ele,
            distance_km: total / 1000.0,
        },
    })
}

/// Resolves a 0..=1 ratio of the total distance to a coordinate by
/// interpolating between the two bracketing points.
pub fn position_at_distance(
    points: &[SanitizedPoint],
    cumulative: &[f64],
    ratio: f64,
) -> Option<ProfileCursor> {
    if points.is_empty() || points.len() != cumulative.len() {
        return None;
    }
    let total = cumulative.last().copied().unwrap_or(0.0);
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let target = ratio * total;

    let upper = cumulative
        .partition_point(|d| *d < target)
        .min(points.len() - 1);
    if upper == 0 {
        return Some(ProfileCursor {
            position: points[0].position(),
            elevation: points[0].elevation,
            distance_m: 0.0,
        });
    }

    let lower = upper - 1;
    let span = cumulative[upper] - cumulative[lower];
    let t = if span > 0.0 {
        (target - cumulative[lower]) / span
    } else {
        0.0
    };
    let a = &points[lower];
    let b = &points[upper];
    Some(ProfileCursor {
        position: lerp(a.position(), b.position(), t),
        elevation: a.elevation + (b.elevation - a.elevation) * t,
        distance_m: target,
    })
}
