use axum::{extract::State, routing::post, Json, Router};
use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::parse;
use crate::pipeline::process::{build_track, TimelineOptions};
use crate::state::AppState;
use crate::types::track::{Metrics, Track, TrackSource};

const PALETTE: [&str; 6] = ["#FF3366", "#00C2FF", "#FF9933", "#4CD964", "#8E2DE2", "#FEB47B"];

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

#[derive(Serialize, Deserialize)]
pub struct TrackSummary {
    pub track_id: String,
    pub name: String,
    pub color: String,
    pub usable: bool,
    pub synthetic_timing: bool,
    pub point_count: usize,
    pub pause_count: usize,
    pub metrics: Metrics,
    pub notices: Vec<String>,
}

impl TrackSummary {
    pub fn from_track(track_id: String, track: &Track) -> Self {
        let mut notices = Vec::new();
        if !track.has() {
            notices.push("Track has fewer than two usable points and cannot be replayed".to_string());
        }
        if track.synthetic_timing {
            notices.push("Track has no usable timestamps; timing is approximated".to_string());
        }
        Self {
            track_id,
            name: track.name.clone(),
            color: track.color.clone(),
            usable: track.has(),
            synthetic_timing: track.synthetic_timing,
            point_count: track.points.len(),
            pause_count: track.pauses.len(),
            metrics: track.metrics.clone(),
            notices,
        }
    }
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TrackSummary>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut name: Option<String> = None;
    let mut color: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                file_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?.to_vec());
            }
            "name" | "color" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e))
                })?;
                let value = value.trim().to_string();
                if !value.is_empty() {
                    if field_name == "name" {
                        name = Some(value);
                    } else {
                        color = Some(value);
                    }
                }
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    if !is_gpx(&filename) {
        return Err(AppError::BadRequest("Unsupported file format".to_string()));
    }

    tracing::info!("Parsing gpx file: {}", filename);

    let parsed = parse::parse_or_empty(&bytes);
    let source = TrackSource {
        name: name
            .or(parsed.name)
            .unwrap_or_else(|| filename.trim_end_matches(".gpx").to_string()),
        color: color.unwrap_or_else(|| PALETTE[state.len() % PALETTE.len()].to_string()),
        points: parsed.points,
    };

    let options = TimelineOptions::from(&state.config().replay_defaults);
    let (track, _) = build_track(&source, &options);
    let track_id = Uuid::new_v4().to_string();
    state.insert(track_id.clone(), source);

    tracing::info!(
        "Uploaded file {} with ID {} ({} points, {:.2} km, usable: {})",
        filename,
        track_id,
        track.points.len(),
        track.metrics.distance_km,
        track.has()
    );

    Ok(Json(TrackSummary::from_track(track_id, &track)))
}

fn is_gpx(filename: &str) -> bool {
    filename
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"))
        && filename.contains('.')
}
