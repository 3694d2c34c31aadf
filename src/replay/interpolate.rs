use crate::pipeline::geo::lerp;
use crate::types::track::{LatLon, SanitizedPoint};

/// Position at an arbitrary absolute time, clamped to the track ends.
/// Uses a binary search, so it suits seeks rather than per-frame stepping.
pub fn position_at(points: &[SanitizedPoint], abs_t: f64) -> Option<LatLon> {
    let first = points.first()?;
    let last = points.last()?;
    if abs_t <= first.t as f64 {
        return Some(first.position());
    }
    if abs_t >= last.t as f64 {
        return Some(last.position());
    }

    let upper = points.partition_point(|p| (p.t as f64) <= abs_t);
    let lower = upper - 1;
    Some(between(&points[lower], &points[upper], abs_t))
}

/// Forward-only index into a track. Never rewinds within one playback run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    idx: usize,
}

impl Cursor {
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn reset(&mut self) {
        self.idx = 0;
    }

    /// Steps past every point whose time has been reached and returns the
    /// interpolated position at `abs_t`.
    pub fn advance(&mut self, points: &[SanitizedPoint], abs_t: f64) -> Option<LatLon> {
        if points.is_empty() {
            return None;
        }
        while self.idx + 1 < points.len() && points[self.idx + 1].t as f64 <= abs_t {
            self.idx += 1;
        }
        let current = &points[self.idx];
        match points.get(self.idx + 1) {
            Some(next) => Some(between(current, next, abs_t)),
            None => Some(current.position()),
        }
    }

    pub fn at_end(&self, points: &[SanitizedPoint]) -> bool {
        !points.is_empty() && self.idx + 1 >= points.len()
    }
}

fn between(a: &SanitizedPoint, b: &SanitizedPoint, abs_t: f64) -> LatLon {
    let span = (b.t - a.t) as f64;
    if span <= 0.0 {
        return a.position();
    }
    lerp(a.position(), b.position(), (abs_t - a.t as f64) / span)
}
