use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::pipeline::opponent::{generate_opponent, is_acceptable_target};
use crate::pipeline::process::{build_track, TimelineOptions};
use crate::replay::headless::{run_headless, ReplayTimeline};
use crate::state::AppState;
use crate::types::payload::ReplayPayload;
use crate::types::track::{PauseInterval, TrackSource};

const DEFAULT_FPS: u32 = 30;
const OPPONENT_COLOR: &str = "#9E9E9E";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/replay", post(replay))
}

#[derive(Serialize)]
struct TrackPauses {
    name: String,
    pauses: Vec<PauseInterval>,
}

#[derive(Serialize)]
struct ReplayResponse {
    #[serde(flatten)]
    timeline: ReplayTimeline,
    pauses: Vec<TrackPauses>,
    notices: Vec<String>,
}

async fn replay(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ReplayResponse>, AppError> {
    let payload = ReplayPayload::from_value(body)?;
    let settings = payload
        .settings
        .clone()
        .unwrap_or_else(|| state.config().replay_defaults.clone());
    let options = TimelineOptions::from(&settings);
    let fps = payload.fps.unwrap_or(DEFAULT_FPS).clamp(20, 60);

    let mut notices = Vec::new();
    let mut tracks = Vec::with_capacity(payload.track_ids.len() + 1);
    for id in &payload.track_ids {
        let source = state
            .get(id)
            .ok_or_else(|| AppError::NotFound(id.clone()))?;
        let (track, stats) = build_track(&source, &options);
        tracing::debug!(
            "Track {}: {} idle stretches, {} reported, {} ms idle",
            id,
            stats.detected,
            stats.reported,
            stats.total_paused_ms
        );
        if !track.has() {
            notices.push(format!("{} has no usable points and is skipped", track.name));
        } else if track.synthetic_timing {
            notices.push(format!("{} has no timestamps; timing is approximated", track.name));
        }
        tracks.push(track);
    }

    if let Some(request) = &payload.opponent {
        if !is_acceptable_target(request.target_duration_secs) {
            return Err(AppError::Unprocessable(format!(
                "Invalid opponent target duration: {}",
                request.target_duration_secs
            )));
        }
        let reference = state
            .get(&request.reference_id)
            .ok_or_else(|| AppError::NotFound(request.reference_id.clone()))?;
        let (reference_track, _) = build_track(&reference, &options);
        match generate_opponent(&reference_track.points, request.target_duration_secs) {
            Some(points) => {
                let source = TrackSource {
                    name: request
                        .name
                        .clone()
                        .unwrap_or_else(|| "Virtual opponent".to_string()),
                    color: OPPONENT_COLOR.to_string(),
                    points,
                };
                tracks.push(build_track(&source, &options).0);
            }
            None => {
                tracing::warn!("Opponent for {} could not be generated", request.reference_id);
                notices.push("Virtual opponent could not be generated".to_string());
            }
        }
    }

    if !tracks.iter().any(|t| t.has()) {
        notices.push("No usable tracks to replay".to_string());
    }

    let pauses = tracks
        .iter()
        .map(|t| TrackPauses {
            name: t.name.clone(),
            pauses: t.pauses.clone(),
        })
        .collect();

    let track_count = tracks.len();
    let mode = settings.mode;
    let timeline = tokio::task::spawn_blocking(move || run_headless(tracks, settings, fps))
        .await
        .map_err(|e| AppError::Internal(format!("Replay task failed: {}", e)))?;

    tracing::info!(
        "Replayed {} tracks in {} mode: {} frames at {:.2}x, {} ranked",
        track_count,
        mode.as_str(),
        timeline.frames.len(),
        timeline.replay_speed,
        timeline.ranking.len()
    );

    Ok(Json(ReplayResponse {
        timeline,
        pauses,
        notices,
    }))
}
