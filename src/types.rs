//! Wire types shared by the endpoint, the client and the page.

use serde::{Deserialize, Serialize};

// ============================================================================
// SPORT ENUM
// ============================================================================

/// Sport of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Football,
    Basketball,
    Tennis,
    Hockey,
    Baseball,
}

impl Sport {
    /// Generator cycle order
    pub const ALL: [Sport; 5] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Tennis,
        Sport::Hockey,
        Sport::Baseball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Tennis => "Tennis",
            Sport::Hockey => "Hockey",
            Sport::Baseball => "Baseball",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sport| sport.as_str() == s)
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A betting opportunity as served by `/api/value-bets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetOpportunity {
    pub id: u32,
    pub sport: Sport,
    #[serde(rename = "match")]
    pub match_name: String,
    /// Edge in percent
    pub value: f64,
    /// Decimal odds
    pub odds: f64,
}

/// Response envelope of `/api/value-bets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBetsResponse {
    pub rows: Vec<BetOpportunity>,
    pub total_row_count: usize,
}

/// One entry of the `/api/bets` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetPlacement {
    pub id: u32,
    #[serde(rename = "match")]
    pub match_name: String,
    pub stake: f64,
}

/// Error body returned by `/api/bets` on failure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
