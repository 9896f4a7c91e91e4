use anyhow::Result;
use std::time::Duration;
use tracing::info;

use barbershop_api::{app, config, middleware};

/// How often connection pool gauges are refreshed.
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Barbershop API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    spawn_pool_metrics(pool.clone());

    let addr = config.socket_addr();
    let app = app::create_app(config, pool);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Periodically records connection pool gauges.
fn spawn_pool_metrics(pool: sqlx::SqlitePool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(POOL_METRICS_INTERVAL);
        loop {
            interval.tick().await;
            persistence::metrics::record_pool_metrics(&pool);
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
