use std::sync::Arc;

use postboard_blob_fs::FsBlobStore;
use postboard_core::config::PostboardConfig;
use postboard_server::{AppState, build_router};
use postboard_storage_sqlite::SqlitePostStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/postboard.toml".to_string());
    let config = PostboardConfig::load(&config_path)?;

    // Ensure the data directory exists
    std::fs::create_dir_all("data")?;

    let post_store = SqlitePostStore::connect(&config.database.url).await?;

    let blobs_path = config.blobs.path.as_deref().unwrap_or("data/blobs");
    let blob_store = FsBlobStore::new(blobs_path)?;

    let addr = format!("{}:{}", config.hostname, config.port);
    tracing::info!(
        per_page = config.posts.per_page,
        max_image_kb = config.posts.max_image_kb,
        blobs = blobs_path,
        "postboard configured"
    );

    let state = AppState::new(Arc::new(post_store), Arc::new(blob_store), config);
    let router = build_router(state);

    tracing::info!("postboard-single starting on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutting down");
}
