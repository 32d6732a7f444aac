use anyhow::Context;
use dotenvy::dotenv;
use edudesk::edudesk_config::ServerConfig;
use edudesk::edudesk_db::{DatabaseConfig, init_db_pool, run_migrations};
use edudesk::logging::{init_tracing, shutdown_tracer};
use edudesk::metrics::{init_metrics, metrics_app};
use edudesk::router::init_router;
use edudesk::state::{AppState, Repositories};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let state = AppState::from_env(Repositories::postgres(pool));
    let mut app = init_router(state);
    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_app(handle));
    }

    let server = ServerConfig::from_env();
    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
