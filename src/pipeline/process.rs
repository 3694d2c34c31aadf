use crate::pipeline::geo::cumulative_distances;
use crate::pipeline::pauses::{compress_pauses, PauseStats};
use crate::pipeline::sanitize::sanitize;
use crate::types::replay::ReplaySettings;
use crate::types::track::{Metrics, SanitizedPoint, Track, TrackSource};

/// The subset of settings that changes how raw points become a timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineOptions {
    pub remove_stops: bool,
    pub mark_long_pauses: bool,
    pub pause_threshold_secs: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self::from(&ReplaySettings::default())
    }
}

impl From<&ReplaySettings> for TimelineOptions {
    fn from(settings: &ReplaySettings) -> Self {
        Self {
            remove_stops: settings.remove_stops,
            mark_long_pauses: settings.mark_long_pauses,
            pause_threshold_secs: settings.pause_threshold_secs(),
        }
    }
}

/// Sanitizes the raw points and derives everything a track needs for display
/// and playback. Nothing is carried over from a previous build.
pub fn build_track(source: &TrackSource, options: &TimelineOptions) -> (Track, PauseStats) {
    let sanitized = sanitize(&source.points);

    let (points, pauses, stats) = if sanitized.points.len() < 2 {
        (sanitized.points, Vec::new(), PauseStats::default())
    } else if options.remove_stops || options.mark_long_pauses {
        let detection = compress_pauses(&sanitized.points, options.pause_threshold_secs);
        let points = if options.remove_stops {
            detection.points
        } else {
            sanitized.points
        };
        let pauses = if options.mark_long_pauses {
            detection.pauses
        } else {
            Vec::new()
        };
        (points, pauses, detection.stats)
    } else {
        (sanitized.points, Vec::new(), PauseStats::default())
    };

    let cumulative = cumulative_distances(&points);
    let total_distance = cumulative.last().copied().unwrap_or(0.0);
    let metrics = compute_metrics(&points, total_distance);

    let track = Track {
        name: source.name.clone(),
        color: source.color.clone(),
        raw: source.points.clone(),
        points,
        cumulative,
        total_distance,
        pauses,
        synthetic_timing: sanitized.synthetic_timing,
        metrics,
    };
    (track, stats)
}

/// Removes the given raw point indices and rebuilds the track from scratch.
/// Out-of-range indices are ignored.
pub fn delete_points(track: &Track, indices: &[usize], options: &TimelineOptions) -> Track {
    let source = TrackSource {
        name: track.name.clone(),
        color: track.color.clone(),
        points: track
            .raw
            .iter()
            .enumerate()
            .filter(|(idx, _)| !indices.contains(idx))
            .map(|(_, p)| p.clone())
            .collect(),
    };
    build_track(&source, options).0
}

fn compute_metrics(points: &[SanitizedPoint], distance_m: f64) -> Metrics {
    let mut elevation_gain_m = 0.0;
    let mut hr_sum = 0u64;
    let mut hr_count = 0;
    let mut max_hr = 0u16;

    for i in 1..points.len() {
        let gain = points[i].elevation - points[i - 1].elevation;
        if gain > 0.0 {
            elevation_gain_m += gain;
        }
    }

    for hr in points.iter().filter_map(|p| p.heart_rate) {
        hr_sum += hr as u64;
        hr_count += 1;
        max_hr = max_hr.max(hr);
    }

    let duration_seconds = match (points.first(), points.last()) {
        (Some(first), Some(last)) => ((last.t - first.t).max(0) / 1000) as u64,
        _ => 0,
    };

    let distance_km = distance_m / 1000.0;
    let avg_speed_kmh = if duration_seconds > 0 {
        (distance_km / (duration_seconds as f64)) * 3600.0
    } else {
        0.0
    };

    Metrics {
        distance_km,
        elevation_gain_m,
        duration_seconds,
        avg_speed_kmh,
        avg_heart_rate: if hr_count > 0 {
            Some((hr_sum / hr_count) as u16)
        } else {
            None
        },
        max_heart_rate: if max_hr > 0 { Some(max_hr) } else { None },
    }
}
