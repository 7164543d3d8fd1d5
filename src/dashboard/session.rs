//! The dashboard page as served by the HTTP server.
//!
//! One [`DashboardPage`] backs every browser talking to this server, so the
//! slip behaves like a single local profile. Listings come straight from the
//! in-process pipeline; placements go over HTTP to the configured bets
//! backend.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::dashboard::client::{ClientResult, DashboardApi, DashboardClient};
use crate::dashboard::page::DashboardPage;
use crate::dashboard::state::DashboardState;
use crate::persistence::KeyValueStore;
use crate::query::ValueBetQuery;
use crate::types::{BetPlacement, ValueBetsResponse};

/// [`DashboardApi`] for a page living inside the server
pub struct LocalApi {
    state: Arc<DashboardState>,
    placement: DashboardClient,
}

impl LocalApi {
    pub fn new(state: Arc<DashboardState>, placement: DashboardClient) -> Self {
        Self { state, placement }
    }
}

#[async_trait]
impl DashboardApi for LocalApi {
    async fn fetch_value_bets(&self, query: &ValueBetQuery) -> ClientResult<ValueBetsResponse> {
        Ok(self.state.query_value_bets(query))
    }

    async fn place_bets(&self, bets: &[BetPlacement]) -> ClientResult<()> {
        self.placement.place_bets(bets).await
    }
}

pub type ServedPage = DashboardPage<LocalApi>;

/// Page shared by the HTML handlers; held across the fetch or placement
pub type SharedPage = Arc<Mutex<ServedPage>>;

/// Restore the served page from `store`
pub fn shared_page(
    state: Arc<DashboardState>,
    placement: DashboardClient,
    store: Arc<dyn KeyValueStore>,
) -> SharedPage {
    let api = LocalApi::new(state, placement);
    Arc::new(Mutex::new(DashboardPage::new(api, store)))
}
