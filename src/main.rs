use axum::{Router, middleware::from_fn};
use dotenv::dotenv;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{
    catalog::handlers::catalog_routes,
    config::config::CONFIG,
    health::handlers::health_routes,
    mw::{request_mw::request_mw, session_mw::session_mw},
    profile::handlers::profile_routes,
    progress::handlers::{leaderboard_routes, progress_routes},
    quiz::handlers::{attempt_routes, attempt_start_routes, public_quiz_routes},
    server::app_state::AppState,
};

mod catalog;
mod common;
mod config;
mod health;
mod mw;
mod profile;
mod progress;
mod quiz;
mod server;
#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_connection_string(&CONFIG.database_url)
        .await
        .unwrap_or_else(|e| panic!("{}", e));

    // Initialize routes
    let public_routes = Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/quizzes", public_quiz_routes(state.clone()))
        .nest("/catalog", catalog_routes(state.clone()))
        .nest("/leaderboard", leaderboard_routes(state.clone()));

    let protected_routes = Router::new()
        .nest("/profile", profile_routes(state.clone()))
        .nest("/progress", progress_routes(state.clone()))
        .nest("/quizzes", attempt_start_routes(state.clone()))
        .nest("/attempts", attempt_routes(state.clone()))
        .layer(from_fn(session_mw));

    let app = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(from_fn(request_mw));

    // Initialize webserver
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", CONFIG.server.address, CONFIG.server.port))
            .await
            .unwrap();

    info!(
        "Server listening on address: {}",
        listener.local_addr().unwrap()
    );
    axum::serve(listener, app).await.unwrap();
}
