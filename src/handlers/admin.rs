//! Admin moderation handlers

use axum::{
    extract::{Query, State},
    Json,
};

use super::ok;
use crate::app_state::AppState;
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{ApiResponse, Item, PaginatedResponse, PaginationParams};
use crate::services::item_service::PlatformStats;

pub async fn stats(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<PlatformStats>>, ApiError> {
    let stats = app_state.item_service.platform_stats().await?;

    Ok(ok(stats))
}

pub async fn pending_items(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Item>>>, ApiError> {
    let (page, limit, _) = params.resolve();

    let (items, total) = app_state.item_service.pending_items(page, limit).await?;

    Ok(ok(PaginatedResponse::new(items, total, page, limit)))
}
