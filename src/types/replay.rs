use serde::{Deserialize, Serialize};

use crate::pipeline::pauses::DEFAULT_PAUSE_THRESHOLD_SECS;
use crate::types::track::LatLon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizMode {
    /// Static fitted view over every track.
    #[default]
    General,
    /// Follows the leader and periodically pulls back to an overview.
    HeadZoom,
}

impl VizMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(VizMode::General),
            "head_zoom" | "headzoom" | "head-zoom" => Some(VizMode::HeadZoom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VizMode::General => "general",
            VizMode::HeadZoom => "head_zoom",
        }
    }
}

/// User-facing knobs that shape sanitization and playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplaySettings {
    pub remove_stops: bool,
    pub mark_long_pauses: bool,
    pub pause_threshold_secs: f64,
    pub mode: VizMode,
    pub desired_duration_secs: f64,
    /// Width over height of the capture surface. Only affects framing.
    pub aspect_ratio: f64,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            remove_stops: false,
            mark_long_pauses: true,
            pause_threshold_secs: DEFAULT_PAUSE_THRESHOLD_SECS,
            mode: VizMode::General,
            desired_duration_secs: 30.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl ReplaySettings {
    pub fn pause_threshold_secs(&self) -> f64 {
        if self.pause_threshold_secs.is_finite() {
            self.pause_threshold_secs.max(1.0)
        } else {
            DEFAULT_PAUSE_THRESHOLD_SECS
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub color: String,
    pub duration_ms: i64,
    pub medal: Option<Medal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    Focus,
    Overview,
}

/// Per-track state as seen by the camera and the rendering adapter for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct TrackFrame {
    pub name: String,
    pub color: String,
    pub has: bool,
    pub position: Option<LatLon>,
    /// Fraction of the track's own duration elapsed, 0..=1.
    pub progress: f64,
    pub done: bool,
}
