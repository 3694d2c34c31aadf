use crate::pipeline::geo::distance_meters;
use crate::types::track::{PauseInterval, SanitizedPoint};

/// Gaps at or below this speed count as standing still.
pub const STOP_SPEED_MPS: f64 = 0.2;
pub const DEFAULT_PAUSE_THRESHOLD_SECS: f64 = 30.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PauseStats {
    /// Every idle stretch found, including the short ones.
    pub detected: usize,
    /// Stretches long enough to be reported.
    pub reported: usize,
    pub total_paused_ms: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PauseDetection {
    /// Same points with all idle time removed from `t`.
    pub points: Vec<SanitizedPoint>,
    /// Only intervals lasting at least the threshold.
    pub pauses: Vec<PauseInterval>,
    pub stats: PauseStats,
}

struct OpenPause {
    start_abs: i64,
    end_abs: i64,
    anchor_idx: usize,
}

/// Finds idle stretches and removes their duration from the timeline.
///
/// A gap between two consecutive points is idle when it is longer than the
/// threshold or when the speed across it is at most [`STOP_SPEED_MPS`].
/// Adjacent idle gaps merge into one interval. Every idle gap is compressed
/// out, but only intervals of at least `threshold_secs` are reported.
///
/// An interval always starts at the time of the point before its first idle
/// gap. Its anchor is that same point when the gap is a long one, but the
/// point after the gap when the interval opens on a low-speed stretch, so
/// `start_abs` and `anchor` can refer to different fixes.
pub fn compress_pauses(points: &[SanitizedPoint], threshold_secs: f64) -> PauseDetection {
    let threshold_ms = (threshold_secs.max(1.0) * 1000.0).round() as i64;

    let mut out = Vec::with_capacity(points.len());
    let mut pauses = Vec::new();
    let mut stats = PauseStats::default();
    let mut open: Option<OpenPause> = None;
    let mut offset_ms: i64 = 0;

    let close = |pause: OpenPause, pauses: &mut Vec<PauseInterval>, stats: &mut PauseStats| {
        let duration_ms = pause.end_abs - pause.start_abs;
        stats.detected += 1;
        if duration_ms >= threshold_ms {
            stats.reported += 1;
            pauses.push(PauseInterval {
                start_abs: pause.start_abs,
                end_abs: pause.end_abs,
                duration_ms,
                anchor: points[pause.anchor_idx].position(),
            });
        }
    };

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            let gap_ms = point.t - prev.t;
            let long_gap = gap_ms > threshold_ms;
            let idle = gap_ms > 0 && (long_gap || {
                let distance = distance_meters(prev.lat, prev.lon, point.lat, point.lon);
                distance / (gap_ms as f64 / 1000.0) <= STOP_SPEED_MPS
            });

            if idle {
                offset_ms += gap_ms;
                match open.as_mut() {
                    Some(pause) => pause.end_abs = point.t,
                    None => {
                        open = Some(OpenPause {
                            start_abs: prev.t,
                            end_abs: point.t,
                            anchor_idx: if long_gap { i - 1 } else { i },
                        })
                    }
                }
            } else if let Some(pause) = open.take() {
                close(pause, &mut pauses, &mut stats);
            }
        }

        let mut adjusted = point.clone();
        adjusted.t = point.t - offset_ms;
        out.push(adjusted);
    }

    if let Some(pause) = open.take() {
        close(pause, &mut pauses, &mut stats);
    }
    stats.total_paused_ms = offset_ms;

    PauseDetection {
        points: out,
        pauses,
        stats,
    }
}

/// Reported pauses without touching the timeline, for marking stops in place.
pub fn detect_pauses(points: &[SanitizedPoint], threshold_secs: f64) -> Vec<PauseInterval> {
    compress_pauses(points, threshold_secs).pauses
}
