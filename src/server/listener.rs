// ────────────────────────────────
// src/server/listener.rs
// Low-level TCP bind kept behind one function so TLS can slot in later.
// ────────────────────────────────
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub async fn bind_tcp(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::debug!(%addr, "probe listener bound");
    Ok(listener)
}
