//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::services::{ItemService, PointsService, SwapService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub auth_service: Arc<AuthService>,
    pub item_service: Arc<ItemService>,
    pub points_service: Arc<PointsService>,
    pub swap_service: Arc<SwapService>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: AppConfig) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(db_pool.clone())),
            item_service: Arc::new(ItemService::new(db_pool.clone())),
            points_service: Arc::new(PointsService::new(db_pool.clone())),
            swap_service: Arc::new(SwapService::new(db_pool.clone())),
            db_pool,
            config,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<ItemService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.item_service.clone()
    }
}

impl FromRef<AppState> for Arc<PointsService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.points_service.clone()
    }
}

impl FromRef<AppState> for Arc<SwapService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.swap_service.clone()
    }
}
