use serde::Serialize;

use crate::replay::clock::ManualClock;
use crate::replay::scheduler::{
    PlaybackPhase, PlaybackScheduler, COUNTDOWN_FROM, COUNTDOWN_STEP_MS, HEAD_ZOOM_SLOWDOWN,
    MAX_FRAME_STEP_MS,
};
use crate::replay::view::{CameraCommand, HeadlessView, ViewAdapter};
use crate::types::replay::{CameraMode, RankingEntry, ReplaySettings, TrackFrame};
use crate::types::track::Track;

const MAX_TIMELINE_FRAMES: usize = 20_000;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineFrame {
    pub rel_ms: f64,
    pub camera_mode: CameraMode,
    pub progress_path_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraCommand>,
    pub tracks: Vec<TrackFrame>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayTimeline {
    pub replay_speed: f64,
    pub max_duration_ms: f64,
    pub opening_camera: Option<CameraCommand>,
    pub frames: Vec<TimelineFrame>,
    pub ranking: Vec<RankingEntry>,
    pub finished: bool,
}

/// Plays the tracks to completion on a manual clock at a fixed frame rate,
/// recording one frame per tick once the countdown is over.
pub fn run_headless(tracks: Vec<Track>, settings: ReplaySettings, fps: u32) -> ReplayTimeline {
    let fps = fps.max(1) as f64;
    let frame_ms = 1000.0 / fps;
    let expected_ms = COUNTDOWN_FROM as f64 * COUNTDOWN_STEP_MS
        + settings.desired_duration_secs.max(0.0) * 1000.0 * HEAD_ZOOM_SLOWDOWN;
    // Running time advances by at most MAX_FRAME_STEP_MS per tick, whatever the frame rate.
    let step_ms = frame_ms.min(MAX_FRAME_STEP_MS);
    let max_ticks = ((expected_ms / step_ms) as usize)
        .saturating_mul(2)
        .clamp(1, MAX_TIMELINE_FRAMES);

    let mut view = HeadlessView::new(settings.aspect_ratio);
    let mut scheduler = PlaybackScheduler::new(tracks, settings);
    let clock = ManualClock::new();

    let opening_camera = scheduler.start();
    if let Some(command) = &opening_camera {
        view.apply(command);
    }
    let generation = scheduler.generation();

    let mut frames = Vec::new();
    for _ in 0..max_ticks {
        let viewport = view.viewport();
        let command = scheduler.frame(&clock, generation, viewport.as_ref());
        if let Some(command) = &command {
            view.apply(command);
        }

        if matches!(scheduler.phase(), PlaybackPhase::Running | PlaybackPhase::Finished) {
            frames.push(TimelineFrame {
                rel_ms: scheduler.rel_ms(),
                camera_mode: scheduler.camera_mode(),
                progress_path_visible: scheduler.progress_path_visible(),
                camera: command,
                tracks: scheduler.frames(),
            });
        }
        if scheduler.phase() == PlaybackPhase::Finished {
            break;
        }
        clock.advance(frame_ms);
    }

    let finished = scheduler.phase() == PlaybackPhase::Finished;
    if !finished {
        tracing::warn!("Headless replay stopped after {} ticks without finishing", max_ticks);
    }

    ReplayTimeline {
        replay_speed: scheduler.replay_speed(),
        max_duration_ms: scheduler.max_duration_ms(),
        opening_camera,
        frames,
        ranking: scheduler.ranking().to_vec(),
        finished,
    }
}
