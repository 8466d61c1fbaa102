//! Item listing and moderation handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{ok, validate_payload};
use crate::app_state::AppState;
use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::models::{ApiResponse, Item, PaginatedResponse};
use crate::services::item_service::{CreateItemRequest, ListItemsQuery, UpdateItemRequest};

/// Closed enumerations for the listing form.
pub async fn constants() -> Json<ApiResponse<serde_json::Value>> {
    ok(json!({
        "categories": ["Men", "Women", "Kids", "Unisex"],
        "types": ["Shirt", "Pants", "Dress", "Jacket", "Shoes", "Accessories", "Other"],
        "sizes": ["XS", "S", "M", "L", "XL", "XXL", "XXXL", "One Size"],
        "conditions": ["New", "Like New", "Good", "Fair", "Poor"],
    }))
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<i32>,
}

pub async fn featured_items(
    State(app_state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    let items = app_state
        .item_service
        .featured_items(query.limit.unwrap_or(10))
        .await?;

    Ok(ok(items))
}

/// Public browse: AVAILABLE items only.
pub async fn list_items(
    State(app_state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<Item>>>, ApiError> {
    let (page, limit) = resolve_page(&query);
    let (items, total) = app_state.item_service.list_items(&query, true).await?;

    Ok(ok(PaginatedResponse::new(items, total, page, limit)))
}

/// Admin browse over every status.
pub async fn list_all_items(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<Item>>>, ApiError> {
    let (page, limit) = resolve_page(&query);
    let (items, total) = app_state.item_service.list_items(&query, false).await?;

    Ok(ok(PaginatedResponse::new(items, total, page, limit)))
}

fn resolve_page(query: &ListItemsQuery) -> (i32, i32) {
    let (page, limit, _) = crate::models::PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    (page, limit)
}

pub async fn get_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let item = app_state
        .item_service
        .get_item(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(ok(item))
}

pub async fn items_by_user(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    let items = app_state
        .item_service
        .items_by_user(&user_id, &caller.id, caller.is_admin)
        .await?;

    Ok(ok(items))
}

pub async fn create_item(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), ApiError> {
    validate_payload(&request)?;

    let item = app_state.item_service.create_item(caller.id, request).await?;

    Ok((StatusCode::CREATED, ok(item)))
}

pub async fn update_item(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    validate_payload(&request)?;

    let item = app_state
        .item_service
        .update_item(&id, &caller.id, request, caller.is_admin)
        .await?;

    Ok(ok(item))
}

pub async fn delete_item(
    AuthUser(caller): AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    app_state
        .item_service
        .delete_item(&id, &caller.id, caller.is_admin)
        .await?;

    Ok(ok(()))
}

pub async fn approve_item(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let item = app_state.item_service.moderate_item(&id, true).await?;

    Ok(ok(item))
}

pub async fn reject_item(
    AdminUser(_admin): AdminUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let item = app_state.item_service.moderate_item(&id, false).await?;

    Ok(ok(item))
}
