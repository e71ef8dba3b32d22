//! User profile handlers: role, tone, favorites.

use super::state::ApiState;
use super::{ApiError, api_error};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub(super) struct RoleResponse {
    role: String,
}

#[derive(Deserialize)]
pub(super) struct UpdateRoleRequest {
    role: String,
}

#[derive(Serialize)]
pub(super) struct ToneResponse {
    tone: String,
}

#[derive(Deserialize)]
pub(super) struct UpdateToneRequest {
    tone: String,
}

#[derive(Serialize)]
pub(super) struct FavoritesResponse {
    favorites: Vec<String>,
}

#[derive(Deserialize)]
pub(super) struct AddFavoriteRequest {
    entry: String,
}

#[derive(Serialize)]
pub(super) struct AddFavoriteResponse {
    status: &'static str,
    total: usize,
}

#[derive(Serialize)]
pub(super) struct StatusResponse {
    status: &'static str,
}

fn profile_error(error: crate::error::ProfileError) -> ApiError {
    tracing::warn!(%error, "profile update failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

pub(super) async fn get_role(State(state): State<Arc<ApiState>>) -> Json<RoleResponse> {
    let profile = state.profiles.load().await;
    Json(RoleResponse { role: profile.role })
}

pub(super) async fn update_role(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .profiles
        .update_role(request.role)
        .await
        .map_err(profile_error)?;
    Ok(Json(StatusResponse {
        status: "role updated",
    }))
}

pub(super) async fn get_tone(State(state): State<Arc<ApiState>>) -> Json<ToneResponse> {
    let profile = state.profiles.load().await;
    Json(ToneResponse { tone: profile.tone })
}

pub(super) async fn update_tone(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<UpdateToneRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .profiles
        .update_tone(request.tone)
        .await
        .map_err(profile_error)?;
    Ok(Json(StatusResponse {
        status: "tone updated",
    }))
}

pub(super) async fn get_favorites(State(state): State<Arc<ApiState>>) -> Json<FavoritesResponse> {
    let profile = state.profiles.load().await;
    Json(FavoritesResponse {
        favorites: profile.favorites,
    })
}

pub(super) async fn add_favorite(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AddFavoriteRequest>,
) -> Result<Json<AddFavoriteResponse>, ApiError> {
    let total = state
        .profiles
        .add_favorite(request.entry)
        .await
        .map_err(profile_error)?;
    Ok(Json(AddFavoriteResponse {
        status: "favorite added",
        total,
    }))
}
