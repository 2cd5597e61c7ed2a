use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::{
    profile::{
        db,
        models::{CreateProfileRequest, PutProfileRequest, SessionContext},
    },
    server::{app_state::AppState, error::ServerError},
};

pub fn profile_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_profile).get(get_profile).put(update_profile))
        .with_state(state)
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let profile = db::create_profile(state.get_pool(), &ctx.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<impl IntoResponse, ServerError> {
    let profile = db::get_profile_by_id(state.get_pool(), &ctx.user_id).await?;
    Ok((StatusCode::OK, Json(profile)))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Json(request): Json<PutProfileRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let profile = db::update_profile(state.get_pool(), &ctx.user_id, request).await?;
    Ok((StatusCode::OK, Json(profile)))
}
