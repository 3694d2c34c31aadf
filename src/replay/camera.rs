use crate::pipeline::geo::distance_between;
use crate::replay::view::{CameraCommand, Viewport};
use crate::types::replay::{CameraMode, TrackFrame, VizMode};
use crate::types::track::{Bounds, LatLon};

pub const OVERVIEW_DWELL_MS: f64 = 2000.0;
pub const FOLLOW_INTERVAL_MS: f64 = 450.0;
pub const FLY_DURATION_MS: f64 = 650.0;
/// Follow cadence and fly time are both stretched by this in head-zoom mode.
pub const HEAD_ZOOM_TIME_FACTOR: f64 = 2.0;
pub const FOLLOW_ZOOM: f64 = 15.0;
/// Fraction trimmed from each side of the visible bounds to form the comfort zone.
pub const COMFORT_INSET: f64 = 0.2;
pub const MIN_LEADER_DISPLACEMENT_M: f64 = 5.0;
const ZOOM_TOLERANCE: f64 = 0.05;
const OVERVIEW_FIT_MS: f64 = 1000.0;

/// Decides between following the leader and showing every track.
///
/// In [`VizMode::General`] the camera fits all tracks once and never moves again.
#[derive(Debug, Clone)]
pub struct CameraController {
    viz_mode: VizMode,
    mode: CameraMode,
    all_bounds: Option<Bounds>,
    aspect_ratio: f64,
    midpoint_shown: bool,
    overview_until: Option<f64>,
    final_overview: bool,
    last_follow_at: Option<f64>,
    flight_until: f64,
    last_leader_pos: Option<LatLon>,
}

impl CameraController {
    pub fn new(viz_mode: VizMode, all_bounds: Option<Bounds>, aspect_ratio: f64) -> Self {
        Self {
            viz_mode,
            mode: CameraMode::Focus,
            all_bounds,
            aspect_ratio,
            midpoint_shown: false,
            overview_until: None,
            final_overview: false,
            last_follow_at: None,
            flight_until: f64::NEG_INFINITY,
            last_leader_pos: None,
        }
    }

    pub fn mode(&self) -> CameraMode {
        match self.viz_mode {
            VizMode::General => CameraMode::Overview,
            VizMode::HeadZoom => self.mode,
        }
    }

    /// Progress paths are hidden while the midpoint overview is on screen.
    pub fn progress_path_visible(&self) -> bool {
        !(self.viz_mode == VizMode::HeadZoom && self.overview_until.is_some() && !self.final_overview)
    }

    /// Framing used when playback begins.
    pub fn start(&mut self) -> Option<CameraCommand> {
        self.overview_command()
    }

    pub fn update(
        &mut self,
        now_ms: f64,
        rel_ms: f64,
        max_duration_ms: f64,
        tracks: &[TrackFrame],
        viewport: Option<&Viewport>,
    ) -> Option<CameraCommand> {
        if self.viz_mode == VizMode::General || self.final_overview {
            return None;
        }

        if tracks.iter().any(|t| t.has && t.done) {
            self.final_overview = true;
            self.overview_until = None;
            self.mode = CameraMode::Overview;
            return self.overview_command();
        }

        if !self.midpoint_shown && max_duration_ms > 0.0 && rel_ms >= max_duration_ms / 2.0 {
            self.midpoint_shown = true;
            self.mode = CameraMode::Overview;
            self.overview_until = Some(now_ms + OVERVIEW_DWELL_MS);
            return self.overview_command();
        }

        if let Some(until) = self.overview_until {
            if now_ms < until {
                return None;
            }
            self.overview_until = None;
            self.mode = CameraMode::Focus;
            // Force the next follow to re-center after the pull-back.
            self.last_follow_at = None;
            self.last_leader_pos = None;
        }

        self.follow_leader(now_ms, tracks, viewport)
    }

    fn follow_leader(
        &mut self,
        now_ms: f64,
        tracks: &[TrackFrame],
        viewport: Option<&Viewport>,
    ) -> Option<CameraCommand> {
        let interval = FOLLOW_INTERVAL_MS * HEAD_ZOOM_TIME_FACTOR;
        if self.last_follow_at.is_some_and(|at| now_ms - at < interval) {
            return None;
        }
        self.last_follow_at = Some(now_ms);

        let viewport = viewport?;
        if viewport.moving || now_ms < self.flight_until {
            return None;
        }
        let leader = select_leader(tracks)?.position?;

        let zoom_matches = (viewport.zoom - FOLLOW_ZOOM).abs() <= ZOOM_TOLERANCE;
        if zoom_matches {
            if let Some(prev) = self.last_leader_pos {
                if distance_between(prev, leader) < MIN_LEADER_DISPLACEMENT_M {
                    return None;
                }
            }
            if viewport.bounds.inset(COMFORT_INSET).contains(leader) {
                return None;
            }
        }

        let duration_ms = FLY_DURATION_MS * HEAD_ZOOM_TIME_FACTOR;
        self.flight_until = now_ms + duration_ms;
        self.last_leader_pos = Some(leader);
        Some(CameraCommand::FlyTo {
            center: leader,
            zoom: FOLLOW_ZOOM,
            duration_ms,
        })
    }

    fn overview_command(&self) -> Option<CameraCommand> {
        self.all_bounds.map(|bounds| CameraCommand::FitBounds {
            bounds: bounds.fit_aspect(self.aspect_ratio),
            duration_ms: OVERVIEW_FIT_MS,
        })
    }
}

/// Track with the greatest fractional progress. On exact ties the one
/// evaluated last wins.
pub fn select_leader(tracks: &[TrackFrame]) -> Option<&TrackFrame> {
    let mut best: Option<&TrackFrame> = None;
    let mut best_progress = f64::NEG_INFINITY;
    for track in tracks.iter().filter(|t| t.has) {
        if track.progress >= best_progress {
            best_progress = track.progress;
            best = Some(track);
        }
    }
    best
}
