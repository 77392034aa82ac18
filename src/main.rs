// =============================================================================
// Copper Outlook — Main Entry Point
// =============================================================================
//
// Serves a four-day directional outlook for copper built from daily futures
// and macro series. Market data is fetched on demand through an hourly TTL
// cache; scoring itself is pure and recomputed per request.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod error;
mod indicators;
mod market_data;
mod runtime_config;
mod signals;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::{SeriesCache, YahooClient};
use crate::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "outlook_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Copper Outlook starting up");

    let config_path =
        std::env::var("OUTLOOK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("OUTLOOK_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        copper = %config.symbols.copper,
        lookback_days = config.lookback_days,
        cache_ttl_secs = config.cache_ttl_secs,
        decay = ?config.model.decay,
        "Model configured"
    );

    // ── 2. Data source + cache ───────────────────────────────────────────
    let yahoo = YahooClient::new(
        config.yahoo_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let cache = SeriesCache::new(yahoo, Duration::from_secs(config.cache_ttl_secs));

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Box::new(cache)));

    // ── 4. Warm the cache once so the first page load is fast ────────────
    match state.build_report(None).await {
        Ok(report) => {
            for call in &report.outlook.calls {
                info!(
                    horizon = call.label,
                    bias = %call.bias,
                    confidence = call.confidence,
                    "initial outlook"
                );
            }
        }
        Err(e) => warn!(error = %e, "initial outlook unavailable"),
    }

    // ── 5. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Copper Outlook shut down complete.");
    Ok(())
}
