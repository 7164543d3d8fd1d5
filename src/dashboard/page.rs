//! Dashboard page: owns the client-side state and wires the panels together.
//!
//! The page keeps filters, sort, pagination, the current rows, the bet
//! selection and the stake map. Selection and stakes are written through a
//! [`KeyValueStore`] on every change, and stakes for deselected bets are
//! pruned whenever the selection changes.
//!
//! Fetches are awaited one at a time through `&mut self`. Nothing cancels a
//! superseded request, so a caller driving the page from several tasks must
//! serialize access itself.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::bet_slip::{self, BetSlip, StakeMap};
use crate::config::{SELECTION_STORAGE_KEY, STAKES_STORAGE_KEY};
use crate::dashboard::client::DashboardApi;
use crate::dashboard::render::{
    render_bet_slip, render_filter_panel, render_opportunities_table, render_page, TableView,
};
use crate::filter_panel::FilterChange;
use crate::persistence::{read_json, write_json, KeyValueStore};
use crate::query::{FilterState, Pagination, SortSpec, ValueBetQuery};
use crate::types::BetOpportunity;

/// Result of a Place Bets click
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceBetsOutcome {
    Placed(usize),
    Failed(String),
}

impl PlaceBetsOutcome {
    /// Text shown to the user
    pub fn notice(&self) -> String {
        match self {
            PlaceBetsOutcome::Placed(n) => format!("{} bet(s) placed successfully!", n),
            PlaceBetsOutcome::Failed(message) => format!("Error: {}", message),
        }
    }
}

/// Dashboard page state
pub struct DashboardPage<A: DashboardApi> {
    api: A,
    store: Arc<dyn KeyValueStore>,
    filters: FilterState,
    sort: Vec<SortSpec>,
    pagination: Pagination,
    selection: Vec<u32>,
    stakes: StakeMap,
    rows: Vec<BetOpportunity>,
    row_count: usize,
    loading: bool,
    placing: bool,
}

impl<A: DashboardApi> DashboardPage<A> {
    /// Restore persisted selection and stakes; rows stay empty until
    /// [`refresh`](Self::refresh)
    pub fn new(api: A, store: Arc<dyn KeyValueStore>) -> Self {
        let selection: Vec<u32> = match read_json(store.as_ref(), SELECTION_STORAGE_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                error!("Error reading selection from storage: {}", e);
                Vec::new()
            }
        };
        let stakes: StakeMap = match read_json(store.as_ref(), STAKES_STORAGE_KEY) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                error!("Error reading stakes from storage: {}", e);
                StakeMap::new()
            }
        };

        let mut page = Self {
            api,
            store,
            filters: FilterState::default(),
            sort: SortSpec::default_model(),
            pagination: Pagination::default(),
            selection: Vec::new(),
            stakes,
            rows: Vec::new(),
            row_count: 0,
            loading: true,
            placing: false,
        };
        // Writes the restored selection back and drops orphaned stakes
        page.set_selection(selection);
        page
    }

    /// Construct and perform the first fetch
    pub async fn load(api: A, store: Arc<dyn KeyValueStore>) -> Self {
        let mut page = Self::new(api, store);
        page.refresh().await;
        page
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn selection(&self) -> &[u32] {
        &self.selection
    }

    pub fn stakes(&self) -> &StakeMap {
        &self.stakes
    }

    pub fn rows(&self) -> &[BetOpportunity] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_placing(&self) -> bool {
        self.placing
    }

    /// Query matching the current filters, sort and page
    pub fn query(&self) -> ValueBetQuery {
        ValueBetQuery::from_state(&self.filters, &self.sort, self.pagination)
    }

    /// Rows of the current page that are in the selection
    pub fn selected_bets(&self) -> Vec<BetOpportunity> {
        self.rows
            .iter()
            .filter(|row| self.selection.contains(&row.id))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Reload rows for the current state; on failure the table is cleared
    pub async fn refresh(&mut self) {
        self.loading = true;
        let query = self.query();

        match self.api.fetch_value_bets(&query).await {
            Ok(response) => {
                self.rows = response.rows;
                self.row_count = response.total_row_count;
            }
            Err(e) => {
                error!("Failed to fetch bets: {}", e);
                self.rows.clear();
            }
        }

        self.loading = false;
    }

    pub async fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh().await;
    }

    /// Apply a change emitted by the filter panel
    pub async fn apply_filter_change(&mut self, change: FilterChange) {
        let next = change.apply(&self.filters);
        self.set_filters(next).await;
    }

    pub async fn set_sort(&mut self, sort: Vec<SortSpec>) {
        self.sort = sort;
        self.refresh().await;
    }

    pub async fn set_pagination(&mut self, pagination: Pagination) {
        self.pagination = pagination;
        self.refresh().await;
    }

    /// Take filters, sort and page from a listing query and refetch.
    /// Absent filters and an empty sort fall back to the page defaults.
    pub async fn navigate(&mut self, query: &ValueBetQuery) {
        self.filters = FilterState::from_query(query);
        self.sort = if query.sort.is_empty() {
            SortSpec::default_model()
        } else {
            query.sort.clone()
        };
        self.pagination = query.pagination;
        self.refresh().await;
    }

    // ------------------------------------------------------------------------
    // Selection and stakes
    // ------------------------------------------------------------------------

    /// Replace the selection, persist it and prune stakes to match
    pub fn set_selection(&mut self, ids: Vec<u32>) {
        let mut selection = Vec::with_capacity(ids.len());
        for id in ids {
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.selection = selection;

        if let Err(e) = write_json(self.store.as_ref(), SELECTION_STORAGE_KEY, &self.selection) {
            error!("Error saving selection to storage: {}", e);
        }

        let before = self.stakes.len();
        self.stakes.retain(|id, _| self.selection.contains(id));
        if self.stakes.len() != before {
            info!("Dropped {} stake(s) for deselected bets", before - self.stakes.len());
        }
        self.persist_stakes();
    }

    pub fn remove_bet(&mut self, id: u32) {
        let remaining = self.selection.iter().copied().filter(|s| *s != id).collect();
        self.set_selection(remaining);
    }

    pub fn clear_all(&mut self) {
        self.set_selection(Vec::new());
    }

    /// Store the raw stake text; negative input is kept and flagged on render
    pub fn set_stake(&mut self, id: u32, raw: impl Into<String>) {
        let raw = raw.into();
        if bet_slip::stake_is_invalid(Some(&raw)) {
            warn!("Stake for bet {} is negative: {:?}", id, raw);
        }
        self.stakes.insert(id, raw);
        self.persist_stakes();
    }

    fn persist_stakes(&self) {
        if let Err(e) = write_json(self.store.as_ref(), STAKES_STORAGE_KEY, &self.stakes) {
            error!("Error saving stakes to storage: {}", e);
        }
    }

    // ------------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------------

    /// Submit positive stakes; on success the selection is cleared
    pub async fn place_bets(&mut self) -> PlaceBetsOutcome {
        self.placing = true;

        let selected = self.selected_bets();
        let payload = bet_slip::placements(&selected, &self.stakes);
        info!("Placing {} bet(s)", payload.len());

        let outcome = match self.api.place_bets(&payload).await {
            Ok(()) => {
                self.set_selection(Vec::new());
                PlaceBetsOutcome::Placed(payload.len())
            }
            Err(e) => {
                error!("Bet placement failed: {}", e);
                PlaceBetsOutcome::Failed(e.to_string())
            }
        };

        self.placing = false;
        outcome
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Full HTML document for the current state
    pub fn render(&self) -> String {
        self.render_with_notice(None)
    }

    /// Full HTML document with a banner, e.g. a placement outcome
    pub fn render_with_notice(&self, notice: Option<&str>) -> String {
        let query = self.query();
        let table = render_opportunities_table(&TableView {
            rows: &self.rows,
            row_count: self.row_count,
            query: &query,
            selection: &self.selection,
            loading: self.loading,
        });

        let selected = self.selected_bets();
        let slip = BetSlip::new(&selected, &self.stakes, self.placing);

        render_page(
            &render_filter_panel(&self.filters),
            &table,
            &render_bet_slip(&slip, &query),
            notice,
        )
    }
}
