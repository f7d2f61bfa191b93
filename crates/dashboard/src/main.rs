//! dashboard: run one dashboard activation against the backend and print the
//! resulting view as JSON.
//!
//! Usage:
//!   cargo run -p dashboard -- --home
//!   cargo run -p dashboard -- ALK
//!   cargo run -p dashboard -- ALK --timeframe weekly

use analysis_core::Timeframe;
use analysis_orchestrator::DashboardOrchestrator;
use anyhow::Context;
use backend_client::{BackendClient, BackendConfig, HttpProvider};
use freshness_gate::{
    FileMarkerStore, FreshnessGate, GateConfig, MarkerStore, MemoryMarkerStore, SystemClock,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dashboard=info,analysis_orchestrator=info,freshness_gate=info,backend_client=warn"
                    .into()
            }),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let home = args.iter().any(|a| a == "--home");

    let timeframe: Timeframe = args
        .iter()
        .position(|a| a == "--timeframe")
        .and_then(|i| args.get(i + 1))
        .map(|v| v.parse())
        .transpose()?
        .unwrap_or(Timeframe::Daily);

    let issuer = args
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            !a.starts_with("--") && (*i == 0 || args[*i - 1] != "--timeframe")
        })
        .map(|(_, a)| a.clone())
        .next();

    let config = BackendConfig::default();
    tracing::info!(
        "Using market service {} and analysis service {}",
        config.market_url,
        config.analysis_url
    );
    let client = BackendClient::new(config).context("Failed to create HTTP client")?;

    let gate_config = GateConfig::default();
    let store: Box<dyn MarkerStore> = match gate_config.marker_path {
        Some(path) => {
            tracing::info!("Scrape marker at {}", path.display());
            Box::new(FileMarkerStore::new(path))
        }
        None => {
            tracing::warn!("No marker path available, scrape marker kept in memory");
            Box::new(MemoryMarkerStore::new())
        }
    };
    let gate = FreshnessGate::new(SystemClock, store).with_marker_key(gate_config.marker_key);

    let orchestrator = DashboardOrchestrator::new(Arc::new(HttpProvider::from(client)), gate);

    let output = if home || issuer.is_none() {
        serde_json::to_string_pretty(&orchestrator.activate_home().await)?
    } else {
        let view = orchestrator
            .activate_details(issuer.as_deref(), timeframe)
            .await;
        serde_json::to_string_pretty(&view)?
    };

    println!("{}", output);
    Ok(())
}
