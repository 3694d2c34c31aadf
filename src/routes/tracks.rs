use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::process::{build_track, delete_points, TimelineOptions};
use crate::pipeline::profile::{build_profile, position_at_distance, ElevationProfile, ProfileCursor};
use crate::pipeline::{export, opponent};
use crate::routes::upload::TrackSummary;
use crate::state::AppState;
use crate::types::track::{Track, TrackSource};

const OPPONENT_COLOR: &str = "#9E9E9E";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tracks/:id", get(summary))
        .route("/api/tracks/:id/profile", get(profile))
        .route("/api/tracks/:id/position", get(position))
        .route("/api/tracks/:id/opponent", post(create_opponent))
        .route("/api/tracks/:id/edit", post(edit))
        .route("/api/tracks/:id/export", get(export_gpx))
}

#[derive(Deserialize)]
struct ProfileQuery {
    #[serde(default = "default_profile_width")]
    width: f64,
    #[serde(default = "default_profile_height")]
    height: f64,
}

fn default_profile_width() -> f64 {
    600.0
}

fn default_profile_height() -> f64 {
    120.0
}

#[derive(Deserialize)]
struct PositionQuery {
    ratio: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OpponentBody {
    target_duration_secs: f64,
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EditBody {
    delete: Vec<usize>,
}

fn load(state: &AppState, id: &str) -> Result<(TrackSource, Track), AppError> {
    let source = state
        .get(id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    let options = TimelineOptions::from(&state.config().replay_defaults);
    let (track, _) = build_track(&source, &options);
    Ok((source, track))
}

async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackSummary>, AppError> {
    let (_, track) = load(&state, &id)?;
    Ok(Json(TrackSummary::from_track(id, &track)))
}

async fn profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Option<ElevationProfile>>, AppError> {
    if !(query.width > 0.0 && query.height > 0.0) {
        return Err(AppError::BadRequest(format!(
            "Invalid profile size: {}x{}",
            query.width, query.height
        )));
    }
    let (_, track) = load(&state, &id)?;
    Ok(Json(build_profile(&track.points, query.width, query.height)))
}

async fn position(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PositionQuery>,
) -> Result<Json<Option<ProfileCursor>>, AppError> {
    let (_, track) = load(&state, &id)?;
    Ok(Json(position_at_distance(
        &track.points,
        &track.cumulative,
        query.ratio,
    )))
}

async fn create_opponent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OpponentBody>,
) -> Result<Json<TrackSummary>, AppError> {
    if !opponent::is_acceptable_target(body.target_duration_secs) {
        return Err(AppError::Unprocessable(format!(
            "Invalid opponent target duration: {}",
            body.target_duration_secs
        )));
    }
    let (source, track) = load(&state, &id)?;
    let points = opponent::generate_opponent(&track.points, body.target_duration_secs)
        .ok_or_else(|| {
            AppError::Unprocessable(format!("Track {} cannot carry a virtual opponent", id))
        })?;

    let opponent_source = TrackSource {
        name: body
            .name
            .unwrap_or_else(|| format!("{} (virtual)", source.name)),
        color: OPPONENT_COLOR.to_string(),
        points,
    };
    let options = TimelineOptions::from(&state.config().replay_defaults);
    let (opponent_track, _) = build_track(&opponent_source, &options);
    let opponent_id = Uuid::new_v4().to_string();
    state.insert(opponent_id.clone(), opponent_source);

    tracing::info!(
        "Generated virtual opponent {} from {} ({:.0} s target)",
        opponent_id,
        id,
        body.target_duration_secs
    );

    Ok(Json(TrackSummary::from_track(opponent_id, &opponent_track)))
}

async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EditBody>,
) -> Result<Json<TrackSummary>, AppError> {
    let (source, track) = load(&state, &id)?;
    let options = TimelineOptions::from(&state.config().replay_defaults);
    let edited = delete_points(&track, &body.delete, &options);

    state.replace(
        &id,
        TrackSource {
            points: edited.raw.clone(),
            ..source
        },
    );

    tracing::info!(
        "Edited track {}: {} -> {} raw points",
        id,
        track.raw.len(),
        edited.raw.len()
    );

    Ok(Json(TrackSummary::from_track(id, &edited)))
}

async fn export_gpx(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let source = state
        .get(&id)
        .ok_or_else(|| AppError::NotFound(id.clone()))?;
    let body = export::to_gpx(&source.name, &source.points)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/gpx+xml")],
        body,
    ))
}
