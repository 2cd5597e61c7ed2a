use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    profile::models::SessionContext,
    quiz::{
        attempts::finalize_attempt,
        db,
        models::{AnswerRequest, NavigateRequest, Phase, QuizPageRequest, SubmitResponse},
        session::QuizAttempt,
    },
    server::{app_state::AppState, error::ServerError},
};

pub fn public_quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/page", post(get_quiz_page))
        .with_state(state)
}

pub fn attempt_start_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{quiz_id}/attempts", post(start_attempt))
        .with_state(state)
}

pub fn attempt_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/{attempt_id}",
            get(get_attempt).delete(abandon_attempt),
        )
        .route("/{attempt_id}/answer", post(select_answer))
        .route("/{attempt_id}/navigate", post(navigate))
        .route("/{attempt_id}/submit", post(submit_attempt))
        .route("/{attempt_id}/result", get(get_result))
        .with_state(state)
}

async fn get_quiz_page(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuizPageRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let page = db::get_quiz_page(state.get_pool(), request).await?;
    Ok((StatusCode::OK, Json(page)))
}

async fn start_attempt(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let definition = db::get_quiz_by_id(state.get_pool(), &quiz_id).await?;

    let snapshot = state
        .get_attempts()
        .start_attempt(state.get_pool().clone(), ctx.user_id, Arc::new(definition))
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_attempt(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let attempt = owned_attempt(&state, &ctx, &attempt_id).await?;
    let snapshot = attempt.lock().await.snapshot();
    Ok((StatusCode::OK, Json(snapshot)))
}

async fn select_answer(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let attempt = owned_attempt(&state, &ctx, &attempt_id).await?;

    let mut guard = attempt.lock().await;
    guard.select_answer(request.question_index, request.option_index)?;

    Ok((StatusCode::OK, Json(guard.snapshot())))
}

async fn navigate(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let attempt = owned_attempt(&state, &ctx, &attempt_id).await?;

    let mut guard = attempt.lock().await;
    guard.navigate(request.direction)?;

    Ok((StatusCode::OK, Json(guard.snapshot())))
}

async fn submit_attempt(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let attempt = owned_attempt(&state, &ctx, &attempt_id).await?;

    // The lock is dropped before persistence so a slow write never holds up
    // other intents against this attempt.
    let result = { attempt.lock().await.submit()? };
    let persisted = finalize_attempt(state.get_pool(), &attempt, &result).await;

    Ok((StatusCode::OK, Json(SubmitResponse::new(result, persisted))))
}

async fn get_result(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let attempt = owned_attempt(&state, &ctx, &attempt_id).await?;

    let guard = attempt.lock().await;
    if guard.phase() != Phase::Completed {
        return Err(ServerError::InvalidState(format!(
            "Attempt {} is not completed",
            attempt_id
        )));
    }

    let result = guard
        .result()
        .cloned()
        .ok_or(ServerError::Internal("Completed attempt has no result".into()))?;

    // Timed-out attempts report a failed write here the same way a manual
    // submit does in its response.
    let persisted = guard.persisted().unwrap_or(false);

    Ok((StatusCode::OK, Json(SubmitResponse::new(result, persisted))))
}

async fn abandon_attempt(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    // Ownership check before removal; abandoning applies no writes.
    owned_attempt(&state, &ctx, &attempt_id).await?;
    state.get_attempts().abandon(&attempt_id);

    Ok(StatusCode::NO_CONTENT)
}

async fn owned_attempt(
    state: &Arc<AppState>,
    ctx: &SessionContext,
    attempt_id: &Uuid,
) -> Result<Arc<Mutex<QuizAttempt>>, ServerError> {
    let attempt = state
        .get_attempts()
        .get(attempt_id)
        .ok_or(ServerError::NotFound(format!(
            "Attempt with id {} does not exist",
            attempt_id
        )))?;

    if attempt.lock().await.user_id() != ctx.user_id {
        return Err(ServerError::AccessDenied);
    }

    Ok(attempt)
}
