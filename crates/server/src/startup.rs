use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router with the production layer stack over the given state.
pub fn app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c; shutting down");
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect, migrate, then serve until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = models::db::connect_with_retry(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    Migrator::up(&db, None).await.map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    info!(event = "migrated", "database schema up to date");

    let app = app(AppState::with_database(db));

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "stopped", "server drained");
    Ok(())
}
