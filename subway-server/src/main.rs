use subway_server::config::ServerConfig;
use subway_server::store::{InMemoryLineStore, SnapshotFile};
use subway_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    let store = match &config.snapshot_path {
        Some(path) => InMemoryLineStore::with_snapshot(SnapshotFile::new(path))?,
        None => {
            info!("no snapshot path configured, line data will not be persisted");
            InMemoryLineStore::new()
        }
    };

    let state = AppState::new(store);
    let app = create_router(state);

    info!(addr = %config.bind_addr, "starting server");
    info!("  GET    /lines/:id                       - Show a line in station order");
    info!("  POST   /lines/:id/sections              - Add a section");
    info!("  DELETE /lines/:id/sections?stationId=   - Remove a station");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
