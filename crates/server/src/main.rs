use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediagrab_core::{
    load_config, Enricher, JobRunner, JobStore, MediaExtractor, MemoryJobStore, SimulatedEnricher,
    YtDlpExtractor,
};

use mediagrab_server::api::create_router;
use mediagrab_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug,mediagrab_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("mediagrab {}", VERSION);

    // Determine config path
    let config_path = std::env::var("MEDIAGRAB_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; a missing file falls back to defaults plus
    // MEDIAGRAB_* environment variables
    if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
    } else {
        info!(
            "No config file at {:?}, using defaults and environment",
            config_path
        );
    }
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    info!("Listen address: {}:{}", config.server.host, config.server.port);
    info!("Extractor binary: {:?}", config.extractor.binary);
    info!("Downloads directory: {:?}", config.storage.downloads_dir);
    info!("Analysis delay: {} ms", config.enrichment.analysis_delay_ms);

    // Prepare the downloads directory
    let downloads_dir = config.storage.downloads_dir.clone();
    tokio::fs::create_dir_all(&downloads_dir)
        .await
        .with_context(|| format!("Failed to create downloads directory {:?}", downloads_dir))?;

    // Create the job store
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    info!("Job store initialized");

    // Create the extractor and check the binary is invocable. A missing
    // binary is not fatal: requests will fail with classified errors, and
    // the binary may appear later.
    let extractor: Arc<dyn MediaExtractor> =
        Arc::new(YtDlpExtractor::new(config.extractor.clone()));
    match extractor.validate().await {
        Ok(()) => info!("Extractor {} is available", extractor.name()),
        Err(e) => warn!("Extractor check failed: {}", e),
    }

    // Create the enricher
    let enricher: Arc<dyn Enricher> = Arc::new(SimulatedEnricher::new(Duration::from_millis(
        config.enrichment.analysis_delay_ms,
    )));
    info!("Using enricher: {}", enricher.name());

    // Create the job runner
    let runner = Arc::new(JobRunner::new(
        Arc::clone(&store),
        Arc::clone(&extractor),
        Arc::clone(&enricher),
        downloads_dir.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(
        store,
        extractor,
        Arc::clone(&runner),
        downloads_dir,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Abort any in-flight downloads; their jobs keep the last recorded state
    info!("Server shutting down...");
    runner.shutdown().await;
    info!("Job runner stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
