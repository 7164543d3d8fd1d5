//! HTTP client the dashboard page uses to talk to its backend.
//!
//! Two calls: listing opportunities from `/api/value-bets` and submitting the
//! slip to `/api/bets`. Neither is retried; a failure is reported once and the
//! user has to trigger the action again.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::{PLACE_BETS_PATH, VALUE_BETS_PATH};
use crate::query::ValueBetQuery;
use crate::types::{ApiErrorBody, BetPlacement, ValueBetsResponse};

/// Message used when `/api/bets` fails without saying why
pub const DEFAULT_PLACEMENT_ERROR: &str = "Failed to place bets.";

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network response was not ok: {0}")]
    Status(StatusCode),

    #[error("Invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Placement refused by the backend, carrying its `message`
    #[error("{0}")]
    Rejected(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// API PORT
// ============================================================================

/// Backend calls made by the dashboard page
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_value_bets(&self, query: &ValueBetQuery) -> ClientResult<ValueBetsResponse>;

    async fn place_bets(&self, bets: &[BetPlacement]) -> ClientResult<()>;
}

// ============================================================================
// REQWEST CLIENT
// ============================================================================

/// reqwest-backed [`DashboardApi`]
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    client: reqwest::Client,
}

impl DashboardClient {
    /// Client for a backend at `base_url`, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn fetch_value_bets(&self, query: &ValueBetQuery) -> ClientResult<ValueBetsResponse> {
        let response = self
            .client
            .get(self.url(VALUE_BETS_PATH))
            .query(&query.to_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body: ValueBetsResponse = response.json().await.map_err(ClientError::Decode)?;
        debug!(
            "Fetched {} of {} value bets",
            body.rows.len(),
            body.total_row_count
        );
        Ok(body)
    }

    async fn place_bets(&self, bets: &[BetPlacement]) -> ClientResult<()> {
        let response = self
            .client
            .post(self.url(PLACE_BETS_PATH))
            .json(bets)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Surface the backend's message when the body carries one
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_PLACEMENT_ERROR.to_string());

        debug!("Bet placement rejected with status {}: {}", status, message);
        Err(ClientError::Rejected(message))
    }
}
