//! Static configuration for the dashboard.
//!
//! Runtime settings (host, port, seed, store path) are read from the environment by
//! [`crate::dashboard::server::DashboardConfig`]; everything here is fixed.

/// Number of opportunities the mock generator produces per call
pub const MOCK_ROW_COUNT: usize = 95;

/// Upper bound (exclusive) of the generated value percentage
pub const MOCK_VALUE_MAX: f64 = 15.0;

/// Lower bound of generated decimal odds
pub const MOCK_ODDS_MIN: f64 = 1.5;

/// Width of the generated odds range, so odds fall in [1.5, 4.5)
pub const MOCK_ODDS_SPAN: f64 = 3.0;

/// Sport name that disables the sport filter
pub const ALL_SPORTS: &str = "All";

/// Sports offered in the filter panel dropdown
pub const FILTER_SPORTS: &[&str] = &["All", "Football", "Basketball", "Tennis"];

/// Default page index
pub const DEFAULT_PAGE: usize = 0;

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default minimum value threshold shown on first load
pub const DEFAULT_MIN_VALUE: f64 = 2.0;

/// Value slider range and step
pub const VALUE_SLIDER_MIN: f64 = 0.0;
pub const VALUE_SLIDER_MAX: f64 = 15.0;
pub const VALUE_SLIDER_STEP: f64 = 0.5;

/// Local storage key for the selected bet ids
pub const SELECTION_STORAGE_KEY: &str = "betSlipSelection";

/// Local storage key for the stake map
pub const STAKES_STORAGE_KEY: &str = "betStakes";

/// Path of the opportunities endpoint
pub const VALUE_BETS_PATH: &str = "/api/value-bets";

/// Path of the external bet placement endpoint
pub const PLACE_BETS_PATH: &str = "/api/bets";

/// Form target that replaces the selection with the ticked table rows
pub const SLIP_SELECTION_PATH: &str = "/slip/selection";

/// Form target for stake edits and the bet slip buttons
pub const SLIP_PATH: &str = "/slip";

/// SQLite file holding the served page's selection and stakes
pub const DEFAULT_SLIP_DB_PATH: &str = "./data/bet_slip.db";
