//! Memory save/search/setup handlers.

use super::state::ApiState;
use super::{ApiError, api_error, save_error_status, search_error_status};
use crate::memory::SearchResult;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct SaveMemoryRequest {
    text: String,
}

#[derive(Serialize)]
pub(super) struct SaveMemoryResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub(super) struct SearchMemoryRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
pub(super) struct SearchMemoryResponse {
    results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub(super) struct SetupResponse {
    status: &'static str,
}

pub(super) async fn save_memory(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SaveMemoryRequest>,
) -> Result<Json<SaveMemoryResponse>, ApiError> {
    state.memory.save(&request.text).await.map_err(|error| {
        tracing::warn!(%error, "failed to save memory");
        api_error(save_error_status(&error), error.to_string())
    })?;

    Ok(Json(SaveMemoryResponse {
        status: "Memory saved",
    }))
}

pub(super) async fn search_memory(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SearchMemoryRequest>,
) -> Result<Json<SearchMemoryResponse>, ApiError> {
    let results = state
        .memory
        .search(&request.query, request.limit)
        .await
        .map_err(|error| {
            tracing::warn!(%error, query = %request.query, "memory search failed");
            api_error(search_error_status(&error), error.to_string())
        })?;

    Ok(Json(SearchMemoryResponse { results }))
}

/// Explicitly provision the collection without writing anything.
pub(super) async fn setup_memory(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<SetupResponse>, ApiError> {
    state.memory.store().provision().await.map_err(|error| {
        tracing::warn!(%error, "memory setup failed");
        let status = match error {
            crate::error::ProvisionError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, error.to_string())
    })?;

    Ok(Json(SetupResponse {
        status: "Memory collection ready",
    }))
}
