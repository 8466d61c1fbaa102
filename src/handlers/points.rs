//! Points handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::ok;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{ApiResponse, PaginatedResponse, PointTransaction};
use crate::services::points_service::{HistoryFilter, LeaderboardEntry, PointsSummary};

pub async fn balance(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let points = app_state.points_service.balance(&caller.id).await?;

    Ok(ok(json!({ "points": points })))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "type", default)]
    pub filter: HistoryFilter,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    #[serde(flatten)]
    pub transactions: PaginatedResponse<PointTransaction>,
    pub summary: PointsSummary,
}

pub async fn transaction_history(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponse>>, ApiError> {
    let (page, limit, _) = crate::models::PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let (transactions, total, summary) = app_state
        .points_service
        .transaction_history(&caller.id, query.filter, page, limit)
        .await?;

    Ok(ok(HistoryResponse {
        transactions: PaginatedResponse::new(transactions, total, page, limit),
        summary,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i32>,
}

pub async fn leaderboard(
    State(app_state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>, ApiError> {
    let entries = app_state
        .points_service
        .leaderboard(query.limit.unwrap_or(10).clamp(1, 100))
        .await?;

    Ok(ok(entries))
}

/// Points price of an item, derived from its condition.
pub async fn calculate_item_points(
    State(app_state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let item = app_state
        .item_service
        .get_item(&item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(ok(json!({
        "itemId": item.id,
        "condition": item.condition,
        "points": item.condition.points_value(),
    })))
}
