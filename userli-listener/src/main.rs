//! Userli webhook listener - syncs Userli accounts into Nextcloud and Synapse.
//!
//! This binary:
//! - Loads configuration from the environment
//! - Serves `POST /userli`
//! - Shuts down gracefully on SIGINT/SIGTERM

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use userli::{build_http_client, router, AppState, Config, Dispatcher, NextcloudClient, SynapseClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured JSON logging
    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("listener_starting");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "config_invalid");
            return Err(e).context("Failed to load configuration");
        }
    };
    info!(
        listen_addr = %config.listen_addr,
        request_timeout_ms = config.request_timeout_ms,
        nextcloud_api_url = %config.nextcloud.api_url,
        nextcloud_domain = %config.nextcloud.domain,
        synapse_api_url = %config.synapse.api_url,
        synapse_domain = %config.synapse.domain,
        "config_loaded"
    );

    let http = build_http_client(Duration::from_millis(config.request_timeout_ms))
        .context("Failed to build HTTP client")?;

    let dispatcher = Dispatcher::new(
        NextcloudClient::new(config.nextcloud.clone(), http.clone()),
        SynapseClient::new(config.synapse.clone(), http),
    );

    let addr = config.listen_addr.clone();
    let app = router(AppState::new(config, dispatcher));

    let listener = TcpListener::bind(addr.as_str())
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "listener_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("listener_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("listener_shutting_down");
}
