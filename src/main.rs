//! Value Bets Dashboard server
//!
//! Serves the opportunities API and the server-rendered dashboard page with
//! its persisted bet slip.
//!
//! ## Environment
//!
//! - `DASHBOARD_HOST` / `DASHBOARD_PORT`: bind address (default `127.0.0.1:8080`)
//! - `DASHBOARD_CORS`: allow any origin (default on)
//! - `MOCK_SEED`: make every response reproducible
//! - `MOCK_ROW_COUNT`: rows generated per request (default 95)
//! - `SLIP_DB_PATH`: SQLite file for the bet slip (default `./data/bet_slip.db`)
//! - `BETS_API_URL`: base URL of the `/api/bets` backend (default: this server)
//! - `RUST_LOG`: log filter

use anyhow::{Context, Result};
use tracing::info;

use value_bets_dashboard::dashboard::{DashboardConfig, DashboardServer};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "value_bets_dashboard=info"
                    .parse()
                    .context("Invalid default log directive")?,
            ),
        )
        .init();

    let config = DashboardConfig::from_env();
    info!("Value Bets Dashboard v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Bind: {}:{} | CORS: {} | rows per request: {}",
        config.host, config.port, config.enable_cors, config.mock_row_count
    );

    DashboardServer::new(config)?.run().await
}
