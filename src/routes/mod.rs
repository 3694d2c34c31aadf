pub mod health;
pub mod replay;
pub mod tracks;
pub mod upload;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .merge(tracks::router())
        .merge(replay::router())
}
