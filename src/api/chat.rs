//! Chat handler: memory-grounded completion plus conversation capture.

use super::state::ApiState;
use super::{ApiError, api_error, search_error_status};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    prompt: String,
}

#[derive(Serialize)]
pub(super) struct ChatResponse {
    response: String,
}

pub(super) async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let memories = state
        .memory
        .search(&request.prompt, None)
        .await
        .map_err(|error| {
            tracing::warn!(%error, "memory lookup for chat failed");
            api_error(search_error_status(&error), error.to_string())
        })?;

    let memory_texts: Vec<String> = memories.into_iter().map(|result| result.text).collect();
    let profile = state.profiles.load().await;

    let reply = state
        .chat
        .reply(&request.prompt, &memory_texts, &profile.name)
        .await
        .map_err(|error| {
            tracing::warn!(%error, "chat completion failed");
            api_error(StatusCode::BAD_GATEWAY, error.to_string())
        })?;

    // Capture both sides of the exchange. A failed capture degrades the
    // assistant's memory, not the reply, so log and move on.
    let user_line = format!("User: {}", request.prompt);
    let assistant_line = format!("{}: {}", state.chat.assistant_name(), reply);
    for line in [user_line, assistant_line] {
        if let Err(error) = state.memory.save(&line).await {
            tracing::warn!(%error, "failed to capture conversation memory");
        }
    }

    Ok(Json(ChatResponse { response: reply }))
}
