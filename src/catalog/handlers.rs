use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::{
    catalog::{
        db,
        models::{CoursePageRequest, OpportunityPageRequest, SubjectPageRequest},
    },
    server::{app_state::AppState, error::ServerError},
};

pub fn catalog_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/courses/page", post(get_course_page))
        .route("/subjects/page", post(get_subject_page))
        .route("/opportunities/page", post(get_opportunity_page))
        .with_state(state)
}

async fn get_course_page(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoursePageRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let page = db::get_course_page(state.get_pool(), request).await?;
    Ok((StatusCode::OK, Json(page)))
}

async fn get_subject_page(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubjectPageRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let page = db::get_subject_page(state.get_pool(), request).await?;
    Ok((StatusCode::OK, Json(page)))
}

async fn get_opportunity_page(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpportunityPageRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let page = db::get_opportunity_page(state.get_pool(), request).await?;
    Ok((StatusCode::OK, Json(page)))
}
