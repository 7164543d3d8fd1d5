//! Value Bets Dashboard
//!
//! Browse sports value betting opportunities from a mock odds endpoint,
//! filter, sort and page them, and stage stakes on a locally persisted bet
//! slip.

pub mod bet_slip;
pub mod config;
pub mod dashboard;
pub mod filter_panel;
pub mod mock_data;
pub mod numeric;
pub mod persistence;
pub mod query;
pub mod types;
