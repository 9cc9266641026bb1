//! Muffin Server
//!
//! Onboards utility customers through a webhook-driven data provider and
//! serves consumption history and forecasts for the dashboard.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use muffin_sdk::client::{BayouClient, ForecastClient, PalmettoClient};
use server::{build_router, run_server};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Muffin - utility onboarding and consumption forecasting backend
#[derive(Parser, Debug)]
#[command(name = "muffin-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./muffin-config.toml", env = "MUFFIN_CONFIG")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting muffin-server v{}", env!("CARGO_PKG_VERSION"));

    let loaded_config = ConfigLoader::new(&args.config, args.listen)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let state = AppState::new(
        Arc::new(BayouClient::new(loaded_config.bayou)),
        Arc::new(ForecastClient::new(loaded_config.forecast)),
        Arc::new(PalmettoClient::new(loaded_config.palmetto)),
        &loaded_config.onboarding,
    );

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    run_server(router, listen_addr).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
