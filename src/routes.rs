//! Route definitions for the ReWear API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::app_state::AppState;
use crate::handlers;

// Auth and user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(handlers::users::me))
        .route("/api/users/profile", get(handlers::users::me))
        .route("/api/users/:id", get(handlers::users::get_user))
}

// Item routes
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/api/items/constants", get(handlers::items::constants))
        .route("/api/items/featured", get(handlers::items::featured_items))
        .route("/api/items/all", get(handlers::items::list_all_items))
        .route(
            "/api/items/user/:user_id",
            get(handlers::items::items_by_user),
        )
        .route("/api/items", get(handlers::items::list_items))
        .route("/api/items", post(handlers::items::create_item))
        .route("/api/items/:id", get(handlers::items::get_item))
        .route("/api/items/:id", put(handlers::items::update_item))
        .route("/api/items/:id", delete(handlers::items::delete_item))
        .route("/api/items/:id/approve", post(handlers::items::approve_item))
        .route("/api/items/:id/reject", post(handlers::items::reject_item))
}

// Swap routes
pub fn swap_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/swaps/requests",
            post(handlers::swaps::create_swap_request),
        )
        .route(
            "/api/swaps/redeem",
            post(handlers::swaps::create_point_redemption),
        )
        .route(
            "/api/swaps/requests",
            get(handlers::swaps::list_swap_requests),
        )
        .route(
            "/api/swaps/requests/:id",
            get(handlers::swaps::swap_request_details),
        )
        .route(
            "/api/swaps/requests/:id/respond",
            post(handlers::swaps::respond_to_swap_request),
        )
        .route(
            "/api/swaps/requests/:id/cancel",
            post(handlers::swaps::cancel_swap_request),
        )
        .route("/api/swaps/history", get(handlers::swaps::swap_history))
}

// Dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route("/api/dashboard/summary", get(handlers::dashboard::summary))
}

// Points routes
pub fn points_routes() -> Router<AppState> {
    Router::new()
        .route("/api/points/balance", get(handlers::points::balance))
        .route(
            "/api/points/transactions",
            get(handlers::points::transaction_history),
        )
        .route(
            "/api/points/leaderboard",
            get(handlers::points::leaderboard),
        )
        .route(
            "/api/points/calculate/:item_id",
            get(handlers::points::calculate_item_points),
        )
}

// Admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(handlers::admin::stats))
        .route(
            "/api/admin/items/pending",
            get(handlers::admin::pending_items),
        )
}
