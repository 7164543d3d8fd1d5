//! Web Dashboard Module
//!
//! Server and client halves of the value bets dashboard. Built with Axum on
//! the server side and reqwest on the client side.
//!
//! # Features
//!
//! - **Listing API**: `GET /api/value-bets` filters, sorts and pages a
//!   freshly generated mock dataset
//! - **Server-rendered page**: `GET /` renders the filter panel, table and bet
//!   slip for the query in the URL; `POST /slip/selection` and `POST /slip`
//!   drive the slip, which is persisted in SQLite
//! - **Dashboard page state**: [`DashboardPage`] drives filters, selection,
//!   stakes and bet placement against any [`DashboardApi`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use value_bets_dashboard::dashboard::{DashboardConfig, DashboardServer};
//!
//! let server = DashboardServer::new(DashboardConfig::from_env())?;
//! server.run().await?;
//! ```

pub mod client;
pub mod handlers;
pub mod page;
pub mod render;
pub mod server;
pub mod session;
pub mod state;

pub use client::{ClientError, DashboardApi, DashboardClient};
pub use page::{DashboardPage, PlaceBetsOutcome};
pub use server::{DashboardConfig, DashboardServer};
pub use session::{LocalApi, SharedPage};
pub use state::DashboardState;
