//! Axum server setup and configuration.
//!
//! This module provides the dashboard server with all routes configured,
//! CORS middleware, request tracing and graceful shutdown support.

use crate::config::{
    DEFAULT_SLIP_DB_PATH, MOCK_ROW_COUNT, SLIP_PATH, SLIP_SELECTION_PATH, VALUE_BETS_PATH,
};
use crate::dashboard::client::DashboardClient;
use crate::dashboard::handlers::{
    api_value_bets, health_check, index_page, update_selection, update_slip,
};
use crate::dashboard::session::{shared_page, SharedPage};
use crate::dashboard::state::DashboardState;
use crate::mock_data::MockDataGenerator;
use crate::persistence::{KeyValueStore, SqliteStore};
use anyhow::Context;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Dashboard server configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Enable CORS for development
    pub enable_cors: bool,
    /// Seed for the mock generator; `None` draws fresh data every request
    pub mock_seed: Option<u64>,
    /// Rows generated per request
    pub mock_row_count: usize,
    /// SQLite file for the served bet slip; `None` keeps it in memory
    pub slip_db_path: Option<String>,
    /// Base URL of the `/api/bets` backend; `None` means this server's own origin
    pub bets_api_url: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            enable_cors: true,
            mock_seed: None,
            mock_row_count: MOCK_ROW_COUNT,
            slip_db_path: None,
            bets_api_url: None,
        }
    }
}

impl DashboardConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mock_seed = match std::env::var("MOCK_SEED") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!("Ignoring unparsable MOCK_SEED={:?}", raw);
                    None
                }
            },
            _ => None,
        };

        Self {
            port: std::env::var("DASHBOARD_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            host: std::env::var("DASHBOARD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            enable_cors: std::env::var("DASHBOARD_CORS")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(true),
            mock_seed,
            mock_row_count: std::env::var("MOCK_ROW_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MOCK_ROW_COUNT),
            slip_db_path: Some(
                std::env::var("SLIP_DB_PATH").unwrap_or_else(|_| DEFAULT_SLIP_DB_PATH.to_string()),
            ),
            bets_api_url: std::env::var("BETS_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Generator described by this config
    pub fn generator(&self) -> MockDataGenerator {
        let generator = match self.mock_seed {
            Some(seed) => MockDataGenerator::seeded(seed),
            None => MockDataGenerator::new(),
        };
        generator.with_count(self.mock_row_count)
    }

    /// Where the served page sends bet placements
    pub fn placement_url(&self) -> String {
        self.bets_api_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    fn open_slip_store(&self) -> anyhow::Result<Arc<dyn KeyValueStore>> {
        let store = match &self.slip_db_path {
            Some(path) => SqliteStore::open(path)
                .with_context(|| format!("Failed to open bet slip store at {}", path))?,
            None => SqliteStore::open_in_memory().context("Failed to open in-memory bet slip store")?,
        };
        Ok(Arc::new(store))
    }
}

/// Dashboard server
pub struct DashboardServer {
    state: Arc<DashboardState>,
    page: SharedPage,
    config: DashboardConfig,
}

impl DashboardServer {
    /// Create a server whose state follows the config, restoring the bet
    /// slip from its store
    pub fn new(config: DashboardConfig) -> anyhow::Result<Self> {
        let state = DashboardState::with_generator(config.generator());
        let store = config.open_slip_store()?;
        let page = shared_page(
            state.clone(),
            DashboardClient::new(config.placement_url()),
            store,
        );
        Ok(Self { state, page, config })
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let cors = if self.config.enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        } else {
            CorsLayer::new()
        };

        let page_routes = Router::new()
            .route("/", get(index_page))
            .route(SLIP_SELECTION_PATH, post(update_selection))
            .route(SLIP_PATH, post(update_slip))
            .with_state(self.page.clone());

        Router::new()
            .route(VALUE_BETS_PATH, get(api_value_bets))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
            .merge(page_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind to the configured address and run until a shutdown signal
    pub async fn run(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid dashboard host/port")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        match self.config.mock_seed {
            Some(seed) => info!("Mock data seeded with {}", seed),
            None => info!("Mock data unseeded, regenerated randomly per request"),
        }
        match &self.config.slip_db_path {
            Some(path) => info!("Bet slip stored in {}", path),
            None => info!("Bet slip kept in memory"),
        }
        info!("Bet placements go to {}", self.config.placement_url());

        let router = self.build_router();
        info!("Dashboard ready at http://{}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Dashboard server shut down");
        Ok(())
    }
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.enable_cors);
        assert!(config.mock_seed.is_none());
        assert_eq!(config.mock_row_count, 95);
        assert!(config.slip_db_path.is_none());
        assert_eq!(config.placement_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_placement_url_prefers_backend() {
        let config = DashboardConfig {
            bets_api_url: Some("http://bets.internal:9000".to_string()),
            ..Default::default()
        };
        assert_eq!(config.placement_url(), "http://bets.internal:9000");
    }

    #[test]
    fn test_config_generator_uses_seed() {
        let config = DashboardConfig {
            mock_seed: Some(9),
            mock_row_count: 20,
            ..Default::default()
        };
        let generator = config.generator();
        assert_eq!(generator.seed(), Some(9));
        assert_eq!(generator.count(), 20);
    }

    #[tokio::test]
    async fn test_spawned_server_answers_health() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = DashboardServer::new(DashboardConfig::default()).unwrap();
        let handle = tokio::spawn(server.serve(listener, std::future::pending()));

        let health: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "healthy");
        handle.abort();
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = DashboardServer::new(DashboardConfig::default()).unwrap();
        let _router = server.build_router();
        // Router should build without panicking
    }
}
