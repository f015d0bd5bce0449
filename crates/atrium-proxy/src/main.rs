//! `Atrium` contact proxy entry point.
//!
//! Loads configuration, builds the upstream relay, then serves the contact
//! endpoint with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use atrium_proxy::config::ProxyConfig;
use atrium_proxy::relay::HttpRelay;
use atrium_proxy::routes;
use atrium_proxy::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        origins = config.allowed_origins.len(),
        max_concurrency = config.max_concurrency,
        "Atrium proxy starting"
    );

    if config.access_key.is_none() {
        warn!("ATRIUM_ACCESS_KEY is not set; every submission will be refused");
    }
    if config.allowed_origins.is_empty() {
        warn!("ATRIUM_ALLOWED_ORIGINS is empty; every cross-origin request will be refused");
    }

    let relay = HttpRelay::new(config.upstream_url.clone(), config.upstream_timeout)
        .context("failed to build upstream relay")?;
    info!(endpoint = relay.endpoint(), "upstream relay ready");
    let state = Arc::new(AppState::new(&config, Arc::new(relay)));
    let app = routes::build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Atrium proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Atrium proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
