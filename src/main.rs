// src/main.rs
use anyhow::Result;
use healthcheck_store::{
    config::{self, Config},
    metrics::MetricsRegistry,
    MemoryStore,
};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthcheck_store=debug".parse()?),
        )
        .init();

    // Load configuration, falling back to defaults without a path
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            config::load_config(&path).await?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let registry = if config.metrics.enabled {
        Some(MetricsRegistry::new()?)
    } else {
        None
    };

    let store = MemoryStore::from_config(
        &config.store,
        registry.as_ref().map(MetricsRegistry::collector),
    );
    store.start().await?;

    shutdown_signal().await;

    store.stop().await?;
    info!("Result store held {} results at shutdown", store.len().await);

    if let Some(registry) = registry {
        info!("Final metrics:\n{}", registry.gather()?);
    }

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
