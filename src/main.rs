// src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

mod config;
mod endpoint;
mod executor;
mod health;
mod probes;
mod registry;
mod server;

use crate::server::{ProbeHandler, ServerBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("health_gateway=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    // Registration phase: single-threaded, before the server starts. The
    // registry and endpoint table are read-only from here on.
    let registry = Arc::new(config.build_registry()?);
    info!("Registered {} health checks", registry.len());

    let endpoints = Arc::new(config.build_endpoints(registry)?);
    let handler = ProbeHandler::new(endpoints);

    info!("Starting health gateway on {}", config.listen);
    ServerBuilder::new(config.listen)
        .with_handler(handler)
        .serve()
        .await?;

    Ok(())
}
