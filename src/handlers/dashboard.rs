//! Dashboard handlers - per-user aggregates for the landing view

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use super::ok;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{ApiResponse, ItemCondition, PointTransaction, SwapRequestStatus, User};
use crate::services::item_service::{RecentItem, UserItemStats};
use crate::services::points_service::HistoryFilter;
use crate::services::swap_service::{
    ListSwapRequestsQuery, RequestScope, SwapRequestView, UserSwapStats,
};

const RECENT_LIMIT: i32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsOverview {
    pub current: i32,
    pub total_earned: i64,
    pub total_redeemed: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub items: UserItemStats,
    pub swaps: UserSwapStats,
    pub points: PointsOverview,
}

/// Ledger entry with its direction spelled out
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    #[serde(flatten)]
    pub transaction: PointTransaction,
    pub is_earned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub items: Vec<RecentItem>,
    pub swap_requests: Vec<SwapRequestView>,
    pub point_transactions: Vec<RecentTransaction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickActions {
    pub has_pending_items: bool,
    pub has_pending_requests_to_respond: bool,
    pub can_redeem_items: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub profile: User,
    pub stats: DashboardStats,
    pub recent_activity: RecentActivity,
    pub quick_actions: QuickActions,
}

/// Aggregate view for the authenticated user: item and swap counts,
/// points totals, recent activity, and what needs attention.
pub async fn dashboard(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let items = app_state.item_service.user_item_stats(&caller.id).await?;
    let swaps = app_state.swap_service.user_swap_stats(&caller.id).await?;

    let (transactions, _, summary) = app_state
        .points_service
        .transaction_history(&caller.id, HistoryFilter::All, 1, RECENT_LIMIT)
        .await?;

    let recent_items = app_state
        .item_service
        .recent_items(&caller.id, RECENT_LIMIT)
        .await?;

    let pending_query = ListSwapRequestsQuery {
        scope: RequestScope::All,
        status: Some(SwapRequestStatus::Pending),
        page: Some(1),
        limit: Some(RECENT_LIMIT),
    };
    let (pending_requests, _) = app_state
        .swap_service
        .list_swap_requests(&caller.id, &pending_query)
        .await?;

    let quick_actions = QuickActions {
        has_pending_items: items.pending > 0,
        has_pending_requests_to_respond: swaps.received.pending > 0,
        // Poor items are the cheapest redemption.
        can_redeem_items: caller.points >= ItemCondition::Poor.points_value(),
    };

    Ok(ok(DashboardResponse {
        stats: DashboardStats {
            items,
            swaps,
            points: PointsOverview {
                current: caller.points,
                total_earned: summary.total_earned,
                total_redeemed: summary.total_redeemed,
            },
        },
        recent_activity: RecentActivity {
            items: recent_items,
            swap_requests: pending_requests,
            point_transactions: transactions
                .into_iter()
                .map(|t| RecentTransaction {
                    is_earned: t.amount > 0,
                    transaction: t,
                })
                .collect(),
        },
        quick_actions,
        profile: caller,
    }))
}

/// Compact counts for the authenticated user.
pub async fn summary(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let items = app_state.item_service.user_item_stats(&caller.id).await?;
    let swaps = app_state.swap_service.user_swap_stats(&caller.id).await?;

    Ok(ok(json!({
        "points": caller.points,
        "availableItems": items.available,
        "completedSwaps": swaps.completed,
        "pendingRequests": swaps.received.pending,
    })))
}
