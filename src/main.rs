//! ReWear Backend Server
//!
//! REST API for the ReWear clothing swap marketplace: item listings,
//! direct swaps and point redemptions, the points ledger, and admin
//! moderation.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use rewear_server::app_state::AppState;
use rewear_server::config::AppConfig;
use rewear_server::handlers;
use rewear_server::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("Failed to run migrations")?;

    let cors = build_cors_layer(&config.cors_allowed_origins);
    let port = config.port;
    let app_state = AppState::new(db_pool, config);

    let app = Router::new()
        .route("/", get(root))
        .route("/api/health", get(handlers::health_check))
        .merge(routes::user_routes())
        .merge(routes::item_routes())
        .merge(routes::swap_routes())
        .merge(routes::dashboard_routes())
        .merge(routes::points_routes())
        .merge(routes::admin_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(app_state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn root() -> &'static str {
    "ReWear API Server"
}

fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    let allowed_origins = allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}
