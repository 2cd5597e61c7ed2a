use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use crate::{profile::models::SessionContext, server::error::ServerError};

/// Authentication itself lives outside this service; the gateway forwards
/// the verified user id in this header.
static STUDENT_ID_HEADER: &str = "X-Student-Id";

pub async fn session_mw(mut req: Request<Body>, next: Next) -> Result<Response, ServerError> {
    let Some(header) = extract_header(STUDENT_ID_HEADER, req.headers()) else {
        return Err(ServerError::Api(
            StatusCode::UNAUTHORIZED,
            "Missing student id header".into(),
        ));
    };

    let user_id = to_uuid(header)?;
    let ctx = SessionContext { user_id };

    info!("Request by student: {}", ctx.user_id);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

fn to_uuid(value: String) -> Result<Uuid, ServerError> {
    value.parse().map_err(|_| {
        ServerError::Api(
            StatusCode::UNAUTHORIZED,
            "Student id is invalid format".into(),
        )
    })
}

fn extract_header(key: &str, header_map: &HeaderMap) -> Option<String> {
    header_map
        .get(key)
        .and_then(|header| header.to_str().ok())
        .map(|s| s.to_owned())
}
