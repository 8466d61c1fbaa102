//! User and profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::ok;
use crate::app_state::AppState;
use crate::auth::{AuthUser, ProfileStats, PublicProfileStats};
use crate::error::ApiError;
use crate::models::{ApiResponse, PublicUser, User};

/// Full profile with listing/swap counts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub stats: ProfileStats,
}

/// Public profile with its counts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub stats: PublicProfileStats,
}

/// The caller's own profile. Creating the user row on first
/// authentication happens inside the extractor.
pub async fn me(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let stats = app_state.auth_service.profile_stats(&caller.id).await?;

    Ok(ok(ProfileResponse {
        user: caller,
        stats,
    }))
}

pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PublicProfileResponse>>, ApiError> {
    let user = app_state
        .auth_service
        .get_user(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let stats = app_state.auth_service.public_profile_stats(&id).await?;

    Ok(ok(PublicProfileResponse {
        user: PublicUser {
            id: user.id,
            name: user.name,
            created_at: user.created_at,
        },
        stats,
    }))
}
