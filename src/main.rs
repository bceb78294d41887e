//! AuraPay - Digital Banking Backend API
//!
//! Backend for the AuraPay demo bank: card issuance and management,
//! balance top-ups and the admin controls behind them.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{middleware, Router};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod auth;
mod config;
mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod jobs;
pub mod model;

pub use config::Config;
pub use error::{AppError, AppResult};

use jobs::{JobScheduler, JobSchedulerConfig};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurapay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router
fn build_router(pool: PgPool) -> Router {
    // Session auth wraps every route except the public admin login; the
    // admin gate is layered inside the protected router itself.
    let protected_routes = api::create_protected_router().layer(middleware::from_fn_with_state(
        pool.clone(),
        api::middleware::session_auth_middleware,
    ));

    let api_router = api::create_public_router().merge(protected_routes);

    Router::new()
        // Health check (no auth)
        .route("/health", axum::routing::get(health_check))
        // API routes
        .nest("/api", api_router)
        // Note: Axum layers are applied in reverse order (last added = first executed)
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting AuraPay server");
    tracing::info!("Connecting to database...");

    // Create database pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    // Verify database schema
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");

    // Start background maintenance
    let scheduler = JobScheduler::with_config(
        pool.clone(),
        JobSchedulerConfig {
            session_cleanup_interval: Duration::from_secs(config.session_cleanup_interval_secs),
        },
    );
    let scheduler_handle = scheduler.start();

    tracing::info!("Listening on http://{}", addr);

    // Build router and start server
    let app = build_router(pool.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    scheduler_handle.abort();
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
