// =============================================================================
// Pulso — Main Entry Point
// =============================================================================
//
// Candle ingestion + indicator pipeline + signal scoring behind a small REST
// surface. One background task polls the exchange; everything else is
// read-only against store snapshots.
// =============================================================================

mod analysis;
mod api;
mod app_state;
mod binance;
mod config;
mod error;
mod indicators;
mod market_data;
mod narrative;
mod signals;
mod types;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        symbol = %config.symbol,
        interval = %config.interval,
        window = config.window_capacity,
        poll_secs = config.poll_interval_secs,
        "Pulso starting"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Acquisition loop ──────────────────────────────────────────────
    let poller_state = state.clone();
    tokio::spawn(async move {
        market_data::run_acquisition_loop(poller_state).await;
    });

    // ── 4. API server ────────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let api_state = state.clone();
    tokio::spawn(async move {
        let app = api::rest::router(api_state);
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .expect("failed to bind API server");
        info!(addr = %bind_addr, "API server listening");
        axum::serve(listener, app).await.expect("API server failed");
    });

    // ── 5. Shutdown ──────────────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("shutdown signal received — stopping");

    Ok(())
}
