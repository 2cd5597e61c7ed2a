use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    profile::models::SessionContext,
    progress::db,
    server::{app_state::AppState, error::ServerError},
};

pub fn progress_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_progress))
        .route("/assignment", post(submit_assignment))
        .with_state(state)
}

pub fn leaderboard_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(get_leaderboard))
        .with_state(state)
}

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<impl IntoResponse, ServerError> {
    let progress = db::get_user_progress(state.get_pool(), &ctx.user_id).await?;
    Ok((StatusCode::OK, Json(progress)))
}

async fn submit_assignment(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<impl IntoResponse, ServerError> {
    let progress = db::record_assignment_submission(state.get_pool(), &ctx.user_id).await?;
    Ok((StatusCode::OK, Json(progress)))
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let entries = db::get_leaderboard(state.get_pool()).await?;
    Ok((StatusCode::OK, Json(entries)))
}
