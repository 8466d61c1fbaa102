//! Swap request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ok, validate_payload};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{ApiResponse, PaginatedResponse, PaginationParams, SwapRequest};
use crate::services::swap_service::{
    CreateSwapRequestInput, ListSwapRequestsQuery, RespondToSwapRequestInput, SwapHistoryEntry,
    SwapRequestDetails, SwapRequestView, SwapResponseOutcome,
};

/// Create a direct swap request or a point redemption, decided by the
/// presence of `offeredItemId`.
pub async fn create_swap_request(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Json(input): Json<CreateSwapRequestInput>,
) -> Result<(StatusCode, Json<ApiResponse<SwapRequest>>), ApiError> {
    validate_payload(&input)?;

    let request = app_state
        .swap_service
        .create_swap_request(caller.id, input)
        .await?;

    Ok((StatusCode::CREATED, ok(request)))
}

/// Point redemption shorthand: same as create with no offered item.
pub async fn create_point_redemption(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Json(mut input): Json<CreateSwapRequestInput>,
) -> Result<(StatusCode, Json<ApiResponse<SwapRequest>>), ApiError> {
    validate_payload(&input)?;
    input.offered_item_id = None;

    let request = app_state
        .swap_service
        .create_swap_request(caller.id, input)
        .await?;

    Ok((StatusCode::CREATED, ok(request)))
}

pub async fn list_swap_requests(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListSwapRequestsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<SwapRequestView>>>, ApiError> {
    let (page, limit, _) = PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let (requests, total) = app_state
        .swap_service
        .list_swap_requests(&caller.id, &query)
        .await?;

    Ok(ok(PaginatedResponse::new(requests, total, page, limit)))
}

pub async fn swap_request_details(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SwapRequestDetails>>, ApiError> {
    let details = app_state
        .swap_service
        .swap_request_details(&id, &caller.id)
        .await?;

    Ok(ok(details))
}

/// Accept or reject a request for one of the caller's items.
pub async fn respond_to_swap_request(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RespondToSwapRequestInput>,
) -> Result<Json<ApiResponse<SwapResponseOutcome>>, ApiError> {
    validate_payload(&input)?;

    let outcome = app_state
        .swap_service
        .respond_to_swap_request(&id, &caller.id, input)
        .await?;

    Ok(ok(outcome))
}

pub async fn cancel_swap_request(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SwapRequest>>, ApiError> {
    let request = app_state
        .swap_service
        .cancel_swap_request(&id, &caller.id)
        .await?;

    Ok(ok(request))
}

pub async fn swap_history(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<SwapHistoryEntry>>>, ApiError> {
    let (page, limit, _) = params.resolve();

    let (entries, total) = app_state
        .swap_service
        .swap_history(&caller.id, page, limit)
        .await?;

    Ok(ok(PaginatedResponse::new(entries, total, page, limit)))
}
