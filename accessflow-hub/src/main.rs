//! accessflow-hub - AccessFlow service entry point
//!
//! Serves the dashboard API, runs the synthetic live access feed and hosts
//! the enrollment workflow and security analysis services.

use std::path::PathBuf;

use accessflow_common::config::ConfigResolver;
use accessflow_common::events::EventBus;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accessflow_hub::analysis::SecurityAnalyst;
use accessflow_hub::logging;
use accessflow_hub::AppState;

/// Event bus capacity for SSE broadcasting
const EVENT_BUS_CAPACITY: usize = 100;

/// Command-line arguments for accessflow-hub
#[derive(Parser, Debug)]
#[command(name = "accessflow-hub")]
#[command(about = "AccessFlow facility access hub")]
#[command(version)]
struct Args {
    /// Config file path (overrides ACCESSFLOW_CONFIG and the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5780
    #[arg(short, long, env = "ACCESSFLOW_BIND")]
    bind: Option<String>,

    /// Log level when RUST_LOG is unset; overrides the config file
    #[arg(long, env = "ACCESSFLOW_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (filter, log_control) = logging::filter_layer(args.log_level.as_deref());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting accessflow-hub v{}", env!("CARGO_PKG_VERSION"));

    let resolver = ConfigResolver::new(args.config.clone());
    let config_source = resolver.resolve();
    info!("Configuration source: {:?}", config_source);
    let config = resolver.load().context("Failed to load configuration")?;

    match log_control.apply_config_level(&config.logging.level) {
        Ok(true) => info!("Log level set to {} from configuration", config.logging.level),
        Ok(false) => {}
        Err(e) => warn!("Failed to apply configured log level: {}", e),
    }

    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
    let analyst = SecurityAnalyst::new(accessflow_hub::config::analysis_config(&config));
    let state = AppState::new(&config, event_bus, analyst);

    let feed = state.log_feed(&config).spawn();
    let enrollment = state.enrollment.clone();

    let app = accessflow_hub::build_router(state);

    let bind_address = args
        .bind
        .clone()
        .unwrap_or_else(|| config.bind_address().to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    feed.shutdown().await;
    enrollment.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
