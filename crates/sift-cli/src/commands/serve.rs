//! `sift serve` -- run the HTTP API until Ctrl+C.

use anyhow::Context;
use clap::Args;
use sift_api::{AppState, build_router};
use tracing::{info, warn};

/// Arguments for `sift serve`.
#[derive(Args)]
pub struct ServeArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bind address (overrides `gateway.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides `gateway.port` and `PORT`).
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.gateway.host = host;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }

    let pipeline = super::build_pipeline(&config)?;
    let router = build_router(AppState::new(pipeline), &config.gateway.cors_origins);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
