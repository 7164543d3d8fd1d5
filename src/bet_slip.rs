//! Bet slip: stake validation, totals and the placement payload.
//!
//! Stakes are kept as the raw strings the user typed. Only entries that parse
//! to a positive number count towards totals or get submitted; a negative
//! entry is flagged but still stored.

use std::collections::BTreeMap;

use crate::numeric::parse_float_prefix;
use crate::types::{BetOpportunity, BetPlacement};

/// Raw stake input per opportunity id
pub type StakeMap = BTreeMap<u32, String>;

/// Helper text under an invalid stake input
pub const INVALID_STAKE_HELP: &str = "Positive only";

/// Prompt shown when nothing is selected
pub const EMPTY_SLIP_PROMPT: &str = "Select bets from the table to add them here.";

/// Stake as a number, 0 when unparsable
pub fn parse_stake(raw: &str) -> f64 {
    parse_float_prefix(raw).unwrap_or(0.0)
}

/// A stake is invalid when it is non-empty and parses negative
pub fn stake_is_invalid(raw: Option<&str>) -> bool {
    match raw {
        Some(raw) if !raw.is_empty() => parse_float_prefix(raw).is_some_and(|v| v < 0.0),
        _ => false,
    }
}

/// Running totals over positive stakes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlipTotals {
    pub total_stake: f64,
    pub total_payout: f64,
}

/// Sum stake and stake*odds over the positive entries
pub fn totals(selected: &[BetOpportunity], stakes: &StakeMap) -> SlipTotals {
    selected.iter().fold(SlipTotals::default(), |mut acc, bet| {
        let stake = stakes.get(&bet.id).map(|s| parse_stake(s)).unwrap_or(0.0);
        if stake > 0.0 {
            acc.total_stake += stake;
            acc.total_payout += stake * bet.odds;
        }
        acc
    })
}

/// Place Bets is disabled with nothing staked or while a placement runs
pub fn can_place(totals: &SlipTotals, placing: bool) -> bool {
    totals.total_stake != 0.0 && !placing
}

/// Request body for `/api/bets`
pub fn placements(selected: &[BetOpportunity], stakes: &StakeMap) -> Vec<BetPlacement> {
    selected
        .iter()
        .map(|bet| BetPlacement {
            id: bet.id,
            match_name: bet.match_name.clone(),
            stake: stakes.get(&bet.id).map(|s| parse_stake(s)).unwrap_or(0.0),
        })
        .filter(|placement| placement.stake > 0.0)
        .collect()
}

/// One rendered line of the slip
#[derive(Debug, Clone, PartialEq)]
pub struct SlipEntry {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    pub stake_input: String,
    pub invalid: bool,
}

impl SlipEntry {
    pub fn helper_text(&self) -> &'static str {
        if self.invalid {
            INVALID_STAKE_HELP
        } else {
            ""
        }
    }
}

/// Borrowed view of the slip for rendering
#[derive(Debug, Clone, Copy)]
pub struct BetSlip<'a> {
    pub selected: &'a [BetOpportunity],
    pub stakes: &'a StakeMap,
    pub placing: bool,
}

impl<'a> BetSlip<'a> {
    pub fn new(selected: &'a [BetOpportunity], stakes: &'a StakeMap, placing: bool) -> Self {
        Self {
            selected,
            stakes,
            placing,
        }
    }

    pub fn has_bets(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn totals(&self) -> SlipTotals {
        totals(self.selected, self.stakes)
    }

    pub fn can_place(&self) -> bool {
        can_place(&self.totals(), self.placing)
    }

    pub fn entries(&self) -> Vec<SlipEntry> {
        self.selected
            .iter()
            .map(|bet| {
                let raw = self.stakes.get(&bet.id).map(String::as_str);
                SlipEntry {
                    id: bet.id,
                    title: format!("{} @ {:.2}", bet.match_name, bet.odds),
                    subtitle: format!("Sport: {} | Value: {}%", bet.sport, bet.value),
                    stake_input: raw.unwrap_or_default().to_string(),
                    invalid: stake_is_invalid(raw),
                }
            })
            .collect()
    }
}
