//! Shared application state for the dashboard server.
//!
//! The server holds no opportunity data between requests. Each request asks
//! the generator for a fresh dataset; the state only carries the generator
//! configuration and a few counters for the health endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::mock_data::MockDataGenerator;
use crate::query::{self, ValueBetQuery};
use crate::types::ValueBetsResponse;

/// Shared dashboard state
pub struct DashboardState {
    /// Source of opportunity rows
    pub generator: MockDataGenerator,

    /// Number of `/api/value-bets` requests served
    pub requests_served: AtomicU64,

    /// Server start, for uptime reporting
    pub started_at: Instant,
}

impl DashboardState {
    /// Create state with an unseeded generator
    pub fn new() -> Arc<Self> {
        Self::with_generator(MockDataGenerator::new())
    }

    /// Create state around a configured generator
    pub fn with_generator(generator: MockDataGenerator) -> Arc<Self> {
        Arc::new(Self {
            generator,
            requests_served: AtomicU64::new(0),
            started_at: Instant::now(),
        })
    }

    /// Generate a dataset and run the query pipeline over it
    pub fn query_value_bets(&self, query: &ValueBetQuery) -> ValueBetsResponse {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
        query::run(self.generator.generate(), query)
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
