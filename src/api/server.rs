//! HTTP server setup: router and API routes.

use super::state::ApiState;
use super::{chat, memories, profile};

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn home(State(state): State<Arc<ApiState>>) -> String {
    let profile = state.profiles.load().await;
    format!("Good day, {}. How may I assist you?", profile.name)
}

/// Build the application router.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/memory/save", post(memories::save_memory))
        .route("/memory/search", post(memories::search_memory))
        .route("/memory/setup", post(memories::setup_memory))
        .route("/chat", post(chat::chat))
        .route("/profile/role", get(profile::get_role).put(profile::update_role))
        .route("/profile/tone", get(profile::get_tone).put(profile::update_tone))
        .route(
            "/profile/favorites",
            get(profile::get_favorites).post(profile::add_favorite),
        );

    Router::new()
        .route("/", get(home))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is shut down.
pub async fn start_http_server(bind: SocketAddr, state: Arc<ApiState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "HTTP server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
