use serde::Serialize;

use crate::error::CaptureError;
use crate::replay::camera::CameraController;
use crate::replay::clock::Clock;
use crate::replay::hooks::{AudioCue, Recorder};
use crate::replay::interpolate::{position_at, Cursor};
use crate::replay::ranking::build_ranking;
use crate::replay::view::{CameraCommand, Viewport};
use crate::types::replay::{CameraMode, RankingEntry, ReplaySettings, TrackFrame, VizMode};
use crate::types::track::{Bounds, LatLon, Track};

pub const COUNTDOWN_FROM: u8 = 3;
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
/// Longest wall-clock step a single frame may apply, so a stalled frame cannot jump.
pub const MAX_FRAME_STEP_MS: f64 = 50.0;
pub const FALLBACK_REPLAY_SPEED: f64 = 8.0;
/// Head-zoom playback runs this many times slower than the fitted target.
pub const HEAD_ZOOM_SLOWDOWN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    CountingDown { remaining: u8 },
    Running,
    Finished,
}

#[derive(Debug, Clone)]
struct TrackRun {
    track: Track,
    cursor: Cursor,
    position: Option<LatLon>,
    revealed: Vec<LatLon>,
    done: bool,
}

impl TrackRun {
    fn new(track: Track) -> Self {
        Self {
            track,
            cursor: Cursor::default(),
            position: None,
            revealed: Vec::new(),
            done: false,
        }
    }

    fn reset(&mut self) {
        self.cursor.reset();
        self.revealed.clear();
        self.done = false;
        self.position = None;
    }

    fn start_t(&self) -> f64 {
        self.track.start_t().unwrap_or(0) as f64
    }
}

/// Drives one multi-track playback run: idle, 3-2-1 countdown, running, finished.
///
/// All tracks are positioned from the same `rel_ms` sample each frame. Time
/// enters only through [`PlaybackScheduler::tick`] (or [`PlaybackScheduler::frame`]
/// with an injected [`Clock`]), so a run can be stepped synchronously.
pub struct PlaybackScheduler {
    runs: Vec<TrackRun>,
    settings: ReplaySettings,
    phase: PlaybackPhase,
    countdown_elapsed_ms: f64,
    rel_ms: f64,
    wall_ms: f64,
    replay_speed: f64,
    max_duration_ms: f64,
    generation: u64,
    last_frame_at: Option<f64>,
    camera: CameraController,
    ranking: Vec<RankingEntry>,
    recorder: Option<Box<dyn Recorder>>,
    capturing: bool,
    capture: Option<Result<Vec<u8>, CaptureError>>,
    audio: Option<Box<dyn AudioCue>>,
}

impl PlaybackScheduler {
    pub fn new(tracks: Vec<Track>, settings: ReplaySettings) -> Self {
        let runs: Vec<TrackRun> = tracks.into_iter().map(TrackRun::new).collect();
        let camera = CameraController::new(settings.mode, union_bounds(&runs), settings.aspect_ratio);
        Self {
            runs,
            settings,
            phase: PlaybackPhase::Idle,
            countdown_elapsed_ms: 0.0,
            rel_ms: 0.0,
            wall_ms: 0.0,
            replay_speed: FALLBACK_REPLAY_SPEED,
            max_duration_ms: 0.0,
            generation: 0,
            last_frame_at: None,
            camera,
            ranking: Vec::new(),
            recorder: None,
            capturing: false,
            capture: None,
            audio: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Box<dyn Recorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn rel_ms(&self) -> f64 {
        self.rel_ms
    }

    pub fn replay_speed(&self) -> f64 {
        self.replay_speed
    }

    pub fn max_duration_ms(&self) -> f64 {
        self.max_duration_ms
    }

    /// Changes on every start and stop. Frame callbacks scheduled for an
    /// older generation are ignored by [`PlaybackScheduler::frame`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera.mode()
    }

    pub fn progress_path_visible(&self) -> bool {
        self.camera.progress_path_visible()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.runs.iter().map(|run| &run.track)
    }

    pub fn revealed_path(&self, idx: usize) -> &[LatLon] {
        self.runs.get(idx).map(|run| run.revealed.as_slice()).unwrap_or(&[])
    }

    /// Output of the recorder once the run finished, if one was attached.
    pub fn take_capture(&mut self) -> Option<Result<Vec<u8>, CaptureError>> {
        self.capture.take()
    }

    pub fn frames(&self) -> Vec<TrackFrame> {
        self.runs
            .iter()
            .map(|run| {
                let duration = run.track.duration_ms() as f64;
                let progress = if duration > 0.0 {
                    (self.rel_ms / duration).clamp(0.0, 1.0)
                } else if run.done {
                    1.0
                } else {
                    0.0
                };
                TrackFrame {
                    name: run.track.name.clone(),
                    color: run.track.color.clone(),
                    has: run.track.has(),
                    position: run.position,
                    progress,
                    done: run.done,
                }
            })
            .collect()
    }

    /// Resets every run and enters the countdown. Returns the opening camera framing.
    pub fn start(&mut self) -> Option<CameraCommand> {
        self.stop();

        self.max_duration_ms = self
            .runs
            .iter()
            .filter(|run| run.track.has())
            .map(|run| run.track.duration_ms())
            .max()
            .unwrap_or(0) as f64;
        self.replay_speed = replay_speed_for(self.max_duration_ms, &self.settings);
        self.camera = CameraController::new(
            self.settings.mode,
            union_bounds(&self.runs),
            self.settings.aspect_ratio,
        );
        self.phase = PlaybackPhase::CountingDown {
            remaining: COUNTDOWN_FROM,
        };
        if let Some(audio) = self.audio.as_mut() {
            audio.countdown_tick(COUNTDOWN_FROM);
        }

        tracing::info!(
            "Playback started: {} tracks, longest {:.0} ms, replay speed {:.2}x",
            self.runs.len(),
            self.max_duration_ms,
            self.replay_speed
        );
        self.camera.start()
    }

    /// Cancels the current run: pending frames and the countdown are dropped
    /// and the clock returns to zero.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.phase = PlaybackPhase::Idle;
        self.countdown_elapsed_ms = 0.0;
        self.rel_ms = 0.0;
        self.wall_ms = 0.0;
        self.last_frame_at = None;
        self.ranking.clear();
        for run in &mut self.runs {
            run.reset();
        }
        if self.capturing {
            if let Some(recorder) = self.recorder.as_mut() {
                if let Err(err) = recorder.stop() {
                    tracing::warn!("Capture failed to stop on cancel: {}", err);
                }
            }
            self.capturing = false;
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
        }
    }

    /// Frame callback driven by a clock. Callbacks carrying a stale
    /// generation are ignored.
    pub fn frame(
        &mut self,
        clock: &dyn Clock,
        generation: u64,
        viewport: Option<&Viewport>,
    ) -> Option<CameraCommand> {
        if generation != self.generation {
            return None;
        }
        let now = clock.now_ms();
        let dt = self.last_frame_at.map(|prev| now - prev).unwrap_or(0.0);
        self.last_frame_at = Some(now);
        self.tick(dt, viewport)
    }

    /// Advances by `dt_ms` of wall-clock time.
    pub fn tick(&mut self, dt_ms: f64, viewport: Option<&Viewport>) -> Option<CameraCommand> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        match self.phase {
            PlaybackPhase::Idle | PlaybackPhase::Finished => None,
            PlaybackPhase::CountingDown { remaining } => {
                self.count_down(remaining, dt_ms);
                None
            }
            PlaybackPhase::Running => self.advance(dt_ms, viewport),
        }
    }

    fn count_down(&mut self, mut remaining: u8, dt_ms: f64) {
        self.countdown_elapsed_ms += dt_ms;
        while remaining > 0 && self.countdown_elapsed_ms >= COUNTDOWN_STEP_MS {
            self.countdown_elapsed_ms -= COUNTDOWN_STEP_MS;
            remaining -= 1;
            if remaining > 0 {
                if let Some(audio) = self.audio.as_mut() {
                    audio.countdown_tick(remaining);
                }
            }
        }

        if remaining == 0 {
            self.begin_running();
        } else {
            self.phase = PlaybackPhase::CountingDown { remaining };
        }
    }

    fn begin_running(&mut self) {
        self.phase = PlaybackPhase::Running;
        self.countdown_elapsed_ms = 0.0;

        for run in self.runs.iter_mut().filter(|run| run.track.has()) {
            let start = run.start_t();
            run.position = position_at(&run.track.points, start);
            run.revealed.extend(run.position);
        }

        if let Some(recorder) = self.recorder.as_mut() {
            match recorder.start() {
                Ok(()) => self.capturing = true,
                Err(err) => {
                    tracing::warn!("Capture failed to start, continuing playback: {}", err);
                    self.capture = Some(Err(err));
                }
            }
        }
    }

    fn advance(&mut self, dt_ms: f64, viewport: Option<&Viewport>) -> Option<CameraCommand> {
        let step = dt_ms.min(MAX_FRAME_STEP_MS);
        self.wall_ms += step;
        self.rel_ms += step * self.replay_speed;

        let rel_ms = self.rel_ms;
        for run in self.runs.iter_mut().filter(|run| run.track.has()) {
            let abs_t = run.start_t() + rel_ms;
            let points = &run.track.points;
            run.position = run.cursor.advance(points, abs_t);
            run.revealed.extend(run.position);

            let end_t = run.track.end_t().unwrap_or(0) as f64;
            if !run.done && run.cursor.at_end(points) && abs_t >= end_t {
                run.done = true;
                tracing::debug!("Track '{}' finished at rel {:.0} ms", run.track.name, rel_ms);
            }
        }

        let frames = self.frames();
        let command = self
            .camera
            .update(self.wall_ms, rel_ms, self.max_duration_ms, &frames, viewport);

        if self
            .runs
            .iter()
            .filter(|run| run.track.has())
            .all(|run| run.done)
        {
            self.finish();
        }
        command
    }

    fn finish(&mut self) {
        self.phase = PlaybackPhase::Finished;
        self.ranking = build_ranking(
            self.runs
                .iter()
                .filter(|run| run.track.has() && run.done)
                .map(|run| {
                    (
                        run.track.name.clone(),
                        run.track.color.clone(),
                        run.track.duration_ms(),
                    )
                })
                .collect(),
        );

        if self.capturing {
            if let Some(recorder) = self.recorder.as_mut() {
                let result = recorder.stop();
                if let Err(err) = &result {
                    tracing::warn!("Capture failed to stop: {}", err);
                }
                self.capture = Some(result);
            }
            self.capturing = false;
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
        }

        tracing::info!(
            "Playback finished after {:.0} ms of wall time, {} ranked",
            self.wall_ms,
            self.ranking.len()
        );
    }
}

/// Maps the longest track onto the desired wall-clock duration.
pub fn replay_speed_for(longest_ms: f64, settings: &ReplaySettings) -> f64 {
    let desired_ms = settings.desired_duration_secs * 1000.0;
    let base = if longest_ms > 0.0 && desired_ms.is_finite() && desired_ms > 0.0 {
        longest_ms / desired_ms
    } else {
        FALLBACK_REPLAY_SPEED
    };
    match settings.mode {
        VizMode::HeadZoom => base / HEAD_ZOOM_SLOWDOWN,
        VizMode::General => base,
    }
}

fn union_bounds(runs: &[TrackRun]) -> Option<Bounds> {
    runs.iter()
        .filter_map(|run| run.track.bounds())
        .reduce(|acc, b| acc.union(&b))
}
