//! Filter, sort and paginate pipeline for opportunity listings.
//!
//! The stages always run in the same order: sport, minimum value, search,
//! sort, page slice. The total row count is taken after filtering and before
//! the slice, so clients can size their pagination controls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::{ALL_SPORTS, DEFAULT_MIN_VALUE, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::numeric::{parse_float_prefix, parse_int_prefix};
use crate::types::{BetOpportunity, ValueBetsResponse};

// ============================================================================
// CLIENT STATE TYPES
// ============================================================================

/// Filters chosen in the filter panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// `"All"` or an exact sport name
    pub sport: String,
    /// Minimum value percentage
    pub value: f64,
    /// Substring matched against the match name
    pub search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sport: ALL_SPORTS.to_string(),
            value: DEFAULT_MIN_VALUE,
            search: String::new(),
        }
    }
}

impl FilterState {
    /// Filters for a URL query; anything absent takes the page default
    pub fn from_query(query: &ValueBetQuery) -> Self {
        let defaults = Self::default();
        Self {
            sport: query.sport.clone().unwrap_or(defaults.sport),
            value: query.min_value.unwrap_or(defaults.value),
            search: query.search.clone().unwrap_or(defaults.search),
        }
    }
}

/// Sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Sport,
    Match,
    Value,
    Odds,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Sport => "sport",
            SortField::Match => "match",
            SortField::Value => "value",
            SortField::Odds => "odds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortField::Id),
            "sport" => Some(SortField::Sport),
            "match" => Some(SortField::Match),
            "value" => Some(SortField::Value),
            "odds" => Some(SortField::Odds),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Anything other than `"asc"` sorts descending
    pub fn parse(s: &str) -> Self {
        if s == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// One key of the sort model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Dashboard default: highest value first
    pub fn default_model() -> Vec<SortSpec> {
        vec![SortSpec::new(SortField::Value, SortDirection::Desc)]
    }
}

/// Page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Slice bounds clamped to `len`
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.page.saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        (start, end)
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Parsed `/api/value-bets` query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBetQuery {
    pub sport: Option<String>,
    pub min_value: Option<f64>,
    pub search: Option<String>,
    /// Only the first entry is applied
    pub sort: Vec<SortSpec>,
    pub pagination: Pagination,
}

impl ValueBetQuery {
    /// Build from raw query pairs, first occurrence wins for scalar keys.
    ///
    /// An unparsable or negative `page` falls back to 0 and an unparsable
    /// `pageSize` to 10, while a `pageSize` of 0 or less yields an empty page.
    /// An unparsable `value` disables the value filter, and a sort is only
    /// recorded when both `sortField` and `sortOrder` are non-empty.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let page = first("page")
            .and_then(parse_int_prefix)
            .filter(|p| *p >= 0)
            .map(|p| p as usize)
            .unwrap_or(DEFAULT_PAGE);
        // A present size is honoured even when it empties the page
        let page_size = first("pageSize")
            .and_then(parse_int_prefix)
            .map(|s| s.max(0) as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let fields = pairs.iter().filter(|(k, _)| k == "sortField").map(|(_, v)| v);
        let orders = pairs.iter().filter(|(k, _)| k == "sortOrder").map(|(_, v)| v);
        let mut sort = Vec::new();
        for (field, order) in fields.zip(orders) {
            if field.is_empty() || order.is_empty() {
                break;
            }
            match SortField::from_str(field) {
                Some(field) => sort.push(SortSpec::new(field, SortDirection::parse(order))),
                None => break,
            }
        }

        Self {
            sport: first("sport").filter(|s| !s.is_empty()).map(str::to_string),
            min_value: first("value")
                .filter(|v| !v.is_empty())
                .and_then(parse_float_prefix),
            search: first("search").filter(|s| !s.is_empty()).map(str::to_string),
            sort,
            pagination: Pagination { page, page_size },
        }
    }

    /// Build from the dashboard's client state
    pub fn from_state(filters: &FilterState, sort: &[SortSpec], pagination: Pagination) -> Self {
        Self {
            sport: Some(filters.sport.clone()).filter(|s| !s.is_empty()),
            min_value: Some(filters.value),
            search: Some(filters.search.clone()).filter(|s| !s.is_empty()),
            sort: sort.to_vec(),
            pagination,
        }
    }

    /// Encode as query pairs, in the order the dashboard sends them
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("sport".to_string(), self.sport.clone().unwrap_or_default()),
            (
                "value".to_string(),
                self.min_value.map(|v| v.to_string()).unwrap_or_default(),
            ),
            ("search".to_string(), self.search.clone().unwrap_or_default()),
            ("page".to_string(), self.pagination.page.to_string()),
            ("pageSize".to_string(), self.pagination.page_size.to_string()),
        ];
        for spec in &self.sort {
            pairs.push(("sortField".to_string(), spec.field.as_str().to_string()));
            pairs.push(("sortOrder".to_string(), spec.direction.as_str().to_string()));
        }
        pairs
    }

    /// Sport to match exactly, `None` when the filter is off
    pub fn sport_filter(&self) -> Option<&str> {
        self.sport.as_deref().filter(|s| *s != ALL_SPORTS)
    }

    pub fn matches(&self, bet: &BetOpportunity) -> bool {
        if let Some(sport) = self.sport_filter() {
            if bet.sport.as_str() != sport {
                return false;
            }
        }
        if let Some(min) = self.min_value {
            if bet.value < min {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !bet
                .match_name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// PIPELINE STAGES
// ============================================================================

/// Keep rows passing the sport, value and search filters
pub fn apply_filters(rows: Vec<BetOpportunity>, query: &ValueBetQuery) -> Vec<BetOpportunity> {
    rows.into_iter().filter(|bet| query.matches(bet)).collect()
}

fn compare(a: &BetOpportunity, b: &BetOpportunity, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Sport => a.sport.as_str().cmp(b.sport.as_str()),
        SortField::Match => a.match_name.cmp(&b.match_name),
        SortField::Value => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
        SortField::Odds => a.odds.partial_cmp(&b.odds).unwrap_or(Ordering::Equal),
    }
}

/// Stable single-key sort
pub fn apply_sort(rows: &mut [BetOpportunity], spec: Option<&SortSpec>) {
    let Some(spec) = spec else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = compare(a, b, spec.field);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Slice out one page, empty when out of range
pub fn paginate(rows: &[BetOpportunity], pagination: Pagination) -> Vec<BetOpportunity> {
    let (start, end) = pagination.bounds(rows.len());
    rows[start..end].to_vec()
}

/// Run the full pipeline
pub fn run(rows: Vec<BetOpportunity>, query: &ValueBetQuery) -> ValueBetsResponse {
    let mut filtered = apply_filters(rows, query);
    apply_sort(&mut filtered, query.sort.first());
    let total_row_count = filtered.len();

    ValueBetsResponse {
        rows: paginate(&filtered, query.pagination),
        total_row_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::MockDataGenerator;
    use crate::types::Sport;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dataset() -> Vec<BetOpportunity> {
        MockDataGenerator::seeded(7).generate()
    }

    #[test]
    fn test_defaults_when_params_missing() {
        let query = ValueBetQuery::from_pairs(&[]);
        assert_eq!(query.pagination, Pagination { page: 0, page_size: 10 });
        assert!(query.sport.is_none());
        assert!(query.min_value.is_none());
        assert!(query.sort.is_empty());
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let query = ValueBetQuery::from_pairs(&pairs(&[
            ("page", "abc"),
            ("pageSize", "many"),
            ("value", "lots"),
        ]));
        assert_eq!(query.pagination, Pagination::default());
        assert!(query.min_value.is_none());

        let query = ValueBetQuery::from_pairs(&pairs(&[("page", "-2"), ("pageSize", "25x")]));
        assert_eq!(query.pagination, Pagination { page: 0, page_size: 25 });
    }

    #[test]
    fn test_filters_from_bare_query_use_page_defaults() {
        let filters = FilterState::from_query(&ValueBetQuery::from_pairs(&[]));
        assert_eq!(filters, FilterState::default());

        let filters = FilterState::from_query(&ValueBetQuery::from_pairs(&pairs(&[
            ("sport", "Tennis"),
            ("value", "0"),
            ("search", "Match 1"),
        ])));
        assert_eq!(filters.sport, "Tennis");
        assert_eq!(filters.value, 0.0);
        assert_eq!(filters.search, "Match 1");
    }

    #[test]
    fn test_first_sort_pair_wins() {
        let query = ValueBetQuery::from_pairs(&pairs(&[
            ("sortField", "odds"),
            ("sortOrder", "asc"),
            ("sortField", "value"),
            ("sortOrder", "desc"),
        ]));
        assert_eq!(query.sort[0], SortSpec::new(SortField::Odds, SortDirection::Asc));
        assert_eq!(query.sort.len(), 2);
    }

    #[test]
    fn test_sort_requires_field_and_order() {
        let query = ValueBetQuery::from_pairs(&pairs(&[("sortField", "odds")]));
        assert!(query.sort.is_empty());
        let query = ValueBetQuery::from_pairs(&pairs(&[("sortField", "odds"), ("sortOrder", "")]));
        assert!(query.sort.is_empty());
        let query =
            ValueBetQuery::from_pairs(&pairs(&[("sortField", "bogus"), ("sortOrder", "asc")]));
        assert!(query.sort.is_empty());
    }

    #[test]
    fn test_unknown_direction_sorts_descending() {
        assert_eq!(SortDirection::parse("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Desc);
    }

    #[test]
    fn test_football_first_page() {
        let query = ValueBetQuery::from_pairs(&pairs(&[
            ("page", "0"),
            ("pageSize", "10"),
            ("sport", "Football"),
        ]));
        let page = run(dataset(), &query);
        assert_eq!(page.total_row_count, 19);
        assert_eq!(page.rows.len(), 10);
        assert!(page.rows.iter().all(|b| b.sport == Sport::Football));
    }

    #[test]
    fn test_all_sport_disables_filter() {
        let query = ValueBetQuery::from_pairs(&pairs(&[("sport", "All")]));
        assert_eq!(run(dataset(), &query).total_row_count, 95);
    }

    #[test]
    fn test_unknown_sport_matches_nothing() {
        let query = ValueBetQuery::from_pairs(&pairs(&[("sport", "Curling")]));
        let page = run(dataset(), &query);
        assert_eq!(page.total_row_count, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_filters_hold_for_every_row() {
        let rows = dataset();
        for sport in ["All", "Football", "Tennis", "Baseball"] {
            for value in ["", "0", "3.5", "9", "14.5"] {
                for search in ["", "match 1", "BALL", "zzz"] {
                    let query = ValueBetQuery::from_pairs(&pairs(&[
                        ("sport", sport),
                        ("value", value),
                        ("search", search),
                        ("pageSize", "200"),
                    ]));
                    let page = run(rows.clone(), &query);
                    let expected = rows.iter().filter(|b| query.matches(b)).count();
                    assert_eq!(page.total_row_count, expected);
                    for bet in &page.rows {
                        if sport != "All" {
                            assert_eq!(bet.sport.as_str(), sport);
                        }
                        if let Ok(min) = value.parse::<f64>() {
                            assert!(bet.value >= min);
                        }
                        assert!(bet
                            .match_name
                            .to_lowercase()
                            .contains(&search.to_lowercase()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ValueBetQuery::from_pairs(&pairs(&[
            ("search", "hOcKeY mAtCh 4"),
            ("pageSize", "100"),
        ]));
        let page = run(dataset(), &query);
        // Hockey ids are 4, 9, 14, ...; only 4, 44 and 49 start with a 4
        let ids: Vec<u32> = page.rows.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![4, 44, 49]);
    }

    #[test]
    fn test_sort_is_monotonic() {
        for field in ["value", "odds", "id", "match", "sport"] {
            for order in ["asc", "desc"] {
                let query = ValueBetQuery::from_pairs(&pairs(&[
                    ("sortField", field),
                    ("sortOrder", order),
                    ("pageSize", "95"),
                ]));
                let page = run(dataset(), &query);
                let spec = query.sort[0];
                for w in page.rows.windows(2) {
                    let ord = compare(&w[0], &w[1], spec.field);
                    match spec.direction {
                        SortDirection::Asc => assert_ne!(ord, Ordering::Greater),
                        SortDirection::Desc => assert_ne!(ord, Ordering::Less),
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_is_stable() {
        let query = ValueBetQuery::from_pairs(&pairs(&[
            ("sortField", "sport"),
            ("sortOrder", "asc"),
            ("pageSize", "95"),
        ]));
        let page = run(dataset(), &query);
        for w in page.rows.windows(2) {
            if w[0].sport == w[1].sport {
                assert!(w[0].id < w[1].id);
            }
        }
    }

    #[test]
    fn test_pagination_windows() {
        let query = ValueBetQuery::from_pairs(&pairs(&[("page", "9"), ("pageSize", "10")]));
        let page = run(dataset(), &query);
        assert_eq!(page.total_row_count, 95);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].id, 91);

        let query = ValueBetQuery::from_pairs(&pairs(&[("page", "10")]));
        let page = run(dataset(), &query);
        assert_eq!(page.total_row_count, 95);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_zero_page_size_gives_empty_page() {
        for size in ["0", "-4"] {
            let query = ValueBetQuery::from_pairs(&pairs(&[("pageSize", size)]));
            assert_eq!(query.pagination.page_size, 0);

            let page = run(dataset(), &query);
            assert!(page.rows.is_empty(), "pageSize={}", size);
            assert_eq!(page.total_row_count, 95);
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let pagination = Pagination {
            page: usize::MAX,
            page_size: usize::MAX,
        };
        assert_eq!(pagination.bounds(95), (95, 95));
    }

    #[test]
    fn test_state_round_trips_through_pairs() {
        let filters = FilterState {
            sport: "Tennis".to_string(),
            value: 2.5,
            search: "match".to_string(),
        };
        let query = ValueBetQuery::from_state(
            &filters,
            &SortSpec::default_model(),
            Pagination { page: 1, page_size: 5 },
        );
        let encoded = query.to_pairs();
        assert!(encoded.contains(&("value".to_string(), "2.5".to_string())));
        assert!(encoded.contains(&("sortOrder".to_string(), "desc".to_string())));
        assert_eq!(ValueBetQuery::from_pairs(&encoded), query);
    }

    #[test]
    fn test_integer_threshold_encodes_without_fraction() {
        let query = ValueBetQuery::from_state(
            &FilterState::default(),
            &[],
            Pagination::default(),
        );
        let encoded = query.to_pairs();
        assert!(encoded.contains(&("value".to_string(), "2".to_string())));
        assert!(encoded.contains(&("sport".to_string(), "All".to_string())));
    }
}
