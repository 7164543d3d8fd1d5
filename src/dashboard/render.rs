//! HTML renderers for the dashboard page.
//!
//! Every renderer returns a self-contained fragment. Controls that change the
//! listing are plain links and a GET form pointing back at `/`. Selection and
//! slip controls are POST forms that carry the listing query in a hidden
//! `return` field, so the page works without client-side scripting.

use crate::bet_slip::{BetSlip, EMPTY_SLIP_PROMPT};
use crate::config::{
    SLIP_PATH, SLIP_SELECTION_PATH, VALUE_SLIDER_MAX, VALUE_SLIDER_MIN, VALUE_SLIDER_STEP,
};
use crate::filter_panel::{sport_options, value_label};
use crate::query::{FilterState, Pagination, SortDirection, SortField, SortSpec, ValueBetQuery};
use crate::types::BetOpportunity;

/// Everything the opportunities table needs
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub rows: &'a [BetOpportunity],
    pub row_count: usize,
    pub query: &'a ValueBetQuery,
    pub selection: &'a [u32],
    pub loading: bool,
}

const COLUMNS: [(SortField, &str); 4] = [
    (SortField::Sport, "Sport"),
    (SortField::Match, "Match"),
    (SortField::Odds, "Odds"),
    (SortField::Value, "Value (%)"),
];

// ============================================================================
// FILTER PANEL
// ============================================================================

pub fn render_filter_panel(filters: &FilterState) -> String {
    let options: String = sport_options()
        .iter()
        .map(|sport| {
            let selected = if *sport == filters.sport { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, sport, selected)
        })
        .collect();

    format!(r#"
    <form method="get" action="/" class="mb-5 flex flex-col sm:flex-row sm:items-center gap-4">
        <label class="block">
            <span class="text-sm font-medium text-gray-700">Sport</span>
            <select id="sport-select" name="sport" class="mt-1 block w-full sm:w-40 rounded-md border-gray-300">{}</select>
        </label>
        <label class="block w-full sm:w-72 sm:px-4">
            <span id="value-slider-label" class="text-sm font-medium text-gray-700">{}</span>
            <input type="range" name="value" aria-labelledby="value-slider-label" value="{}" min="{}" max="{}" step="{}" class="w-full" />
        </label>
        <label class="block">
            <span class="text-sm font-medium text-gray-700">Search Match</span>
            <input type="text" name="search" value="{}" class="mt-1 block rounded-md border-gray-300" />
        </label>
        <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md">Apply</button>
    </form>
    "#,
        options,
        html_escape(&value_label(filters)),
        filters.value,
        VALUE_SLIDER_MIN,
        VALUE_SLIDER_MAX,
        VALUE_SLIDER_STEP,
        html_escape(&filters.search),
    )
}

// ============================================================================
// OPPORTUNITIES TABLE
// ============================================================================

/// Form field naming the listing a POST should send the browser back to
pub const RETURN_FIELD: &str = "return";

fn encode_query(query: &ValueBetQuery) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.to_pairs())
        .finish()
}

/// Link to `/` with the given query
fn query_href(query: &ValueBetQuery) -> String {
    format!("/?{}", html_escape(&encode_query(query)))
}

fn return_field(query: &ValueBetQuery) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}" />"#,
        RETURN_FIELD,
        html_escape(&encode_query(query))
    )
}

/// Header link: clicking the active column flips its direction
fn sort_href(query: &ValueBetQuery, field: SortField) -> (String, &'static str) {
    let active = query.sort.first().filter(|s| s.field == field);
    let (next, marker) = match active {
        Some(spec) if spec.direction == SortDirection::Asc => (SortDirection::Desc, " ▲"),
        Some(_) => (SortDirection::Asc, " ▼"),
        None => (SortDirection::Asc, ""),
    };
    let mut next_query = query.clone();
    next_query.sort = vec![SortSpec::new(field, next)];
    next_query.pagination.page = 0;
    (query_href(&next_query), marker)
}

fn page_href(query: &ValueBetQuery, page: usize) -> String {
    let mut next_query = query.clone();
    next_query.pagination.page = page;
    query_href(&next_query)
}

pub fn render_opportunities_table(view: &TableView<'_>) -> String {
    let mut html = String::new();

    if view.loading {
        html.push_str(r#"<div class="text-sm text-gray-500 py-2">Loading...</div>"#);
    }

    if view.rows.is_empty() && !view.loading {
        html.push_str(r#"
        <div class="text-center py-8 text-gray-500">
            <p class="mt-2">No value bets match these filters</p>
        </div>
        "#);
    } else {
        html.push_str(&format!(
            r#"
    <form method="post" action="{}">
    {}
    <table class="min-w-full divide-y divide-gray-200">"#,
            SLIP_SELECTION_PATH,
            return_field(view.query)
        ));
        html.push_str(r#"
        <thead class="bg-gray-50">
            <tr>
                <th class="px-3 py-3"></th>"#);
        for (field, title) in COLUMNS {
            let (href, marker) = sort_href(view.query, field);
            html.push_str(&format!(
                r#"
                <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider"><a href="{}">{}{}</a></th>"#,
                href, title, marker
            ));
        }
        html.push_str(r#"
            </tr>
        </thead>
        <tbody class="bg-white divide-y divide-gray-200">
    "#);

        for bet in view.rows {
            let checked = if view.selection.contains(&bet.id) { " checked" } else { "" };
            html.push_str(&format!(r#"
            <tr class="hover:bg-gray-50">
                <td class="px-3 py-4"><input type="checkbox" name="selection" value="{}"{} /></td>
                <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{}</td>
                <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{}</td>
                <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900 text-right">{:.2}</td>
                <td class="px-6 py-4 whitespace-nowrap text-sm text-green-600 text-right">{:.2}</td>
            </tr>
        "#,
                bet.id,
                checked,
                bet.sport,
                html_escape(&bet.match_name),
                bet.odds,
                bet.value
            ));
        }

        html.push_str(r#"</tbody></table>
    <div class="flex justify-end py-2">
        <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md">Update Slip</button>
    </div>
    </form>"#);
    }

    html.push_str(&render_pagination(view.query.pagination, view.row_count, view.query));
    html
}

fn render_pagination(pagination: Pagination, row_count: usize, query: &ValueBetQuery) -> String {
    let (start, end) = pagination.bounds(row_count);
    let range = if start == end {
        format!("0 of {}", row_count)
    } else {
        format!("{}–{} of {}", start + 1, end, row_count)
    };

    let prev = if pagination.page > 0 {
        format!(r#"<a href="{}" class="px-2">Previous</a>"#, page_href(query, pagination.page - 1))
    } else {
        String::new()
    };
    let next = if end < row_count {
        format!(r#"<a href="{}" class="px-2">Next</a>"#, page_href(query, pagination.page + 1))
    } else {
        String::new()
    };

    format!(
        r#"<div class="flex justify-end items-center gap-2 py-2 text-sm text-gray-700">{}<span>{}</span>{}</div>"#,
        prev, range, next
    )
}

// ============================================================================
// BET SLIP
// ============================================================================

pub fn render_bet_slip(slip: &BetSlip<'_>, query: &ValueBetQuery) -> String {
    if !slip.has_bets() {
        return format!(r#"
    <div class="bg-white rounded-lg shadow p-4 h-96 flex flex-col">
        <h3 class="text-lg font-medium text-gray-900">Bet Slip</h3>
        <p class="text-sm text-gray-500 text-center mt-8">{}</p>
    </div>
    "#, EMPTY_SLIP_PROMPT);
    }

    let mut items = String::new();
    for entry in slip.entries() {
        let (input_class, helper) = if entry.invalid {
            ("border-red-500", format!(r#"<p class="text-xs text-red-600">{}</p>"#, entry.helper_text()))
        } else {
            ("border-gray-300", String::new())
        };
        items.push_str(&format!(r#"
            <li class="pt-2 pb-4">
                <div class="flex justify-between items-center">
                    <div>
                        <div class="text-sm font-medium text-gray-900">{}</div>
                        <div class="text-xs text-gray-500">{}</div>
                    </div>
                    <button type="submit" aria-label="delete" name="remove" value="{}">&times;</button>
                </div>
                <label class="mt-1 flex items-center">$<input type="number" step="any" name="stake-{}" value="{}" class="w-24 rounded-md {}" /></label>
                {}
            </li>
        "#,
            html_escape(&entry.title),
            html_escape(&entry.subtitle),
            entry.id,
            entry.id,
            html_escape(&entry.stake_input),
            input_class,
            helper
        ));
    }

    let totals = slip.totals();
    let disabled = if slip.can_place() { "" } else { " disabled" };
    let button_label = if slip.placing { "Placing..." } else { "Place Bets" };

    // Enter in a stake box submits the first button, which only saves stakes
    format!(r#"
    <form method="post" action="{}" class="bg-white rounded-lg shadow p-4 h-96 flex flex-col">
        {}
        <button type="submit" name="action" value="save" class="sr-only">Save Stakes</button>
        <div class="flex justify-between items-center">
            <h3 class="text-lg font-medium text-gray-900">Bet Slip</h3>
            <button type="submit" class="text-sm text-blue-600" name="action" value="clear-all">Clear All</button>
        </div>
        <ul class="flex-grow overflow-auto mt-2">{}</ul>
        <hr class="my-2" />
        <div class="p-2">
            <p>Total Stake: <strong>${:.2}</strong></p>
            <p>Potential Payout: <strong>${:.2}</strong></p>
        </div>
        <button type="submit" class="mt-2 px-4 py-2 bg-blue-600 text-white rounded-md" name="action" value="place-bets"{}>{}</button>
    </form>
    "#,
        SLIP_PATH,
        return_field(query),
        items,
        totals.total_stake,
        totals.total_payout,
        disabled,
        button_label
    )
}

// ============================================================================
// PAGE
// ============================================================================

/// Wrap the three panels and an optional notice into a full HTML document
pub fn render_page(filter_panel: &str, table: &str, bet_slip: &str, notice: Option<&str>) -> String {
    let notice = notice
        .map(|text| {
            let tone = if text.starts_with("Error") {
                "bg-red-100 text-red-800"
            } else {
                "bg-green-100 text-green-800"
            };
            format!(r#"<div role="alert" class="mb-4 rounded-md px-4 py-2 {}">{}</div>"#, tone, html_escape(text))
        })
        .unwrap_or_default();

    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>Betting Dashboard</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 p-6">
    <h1 class="text-2xl font-bold mb-4">Betting Dashboard</h1>
    {}
    {}
    <div class="flex flex-col md:flex-row gap-5 mt-5">
        <div class="md:flex-[3]">{}</div>
        <div class="md:flex-1">{}</div>
    </div>
</body>
</html>
"#,
        notice, filter_panel, table, bet_slip
    )
}

/// Simple HTML escaping to prevent XSS
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet_slip::StakeMap;
    use crate::types::Sport;

    fn bet(id: u32) -> BetOpportunity {
        BetOpportunity {
            id,
            sport: Sport::Football,
            match_name: format!("Football Match {}", id),
            value: 6.0,
            odds: 2.0,
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
    }

    #[test]
    fn test_filter_panel_marks_selected_sport() {
        let filters = FilterState {
            sport: "Tennis".to_string(),
            value: 4.5,
            search: "<b>".to_string(),
        };
        let html = render_filter_panel(&filters);
        assert!(html.contains(r#"<option value="Tennis" selected>"#));
        assert!(html.contains("Min Value (4.5%)"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_empty_slip_shows_prompt_only() {
        let stakes = StakeMap::new();
        let html = render_bet_slip(&BetSlip::new(&[], &stakes, false), &ValueBetQuery::default());
        assert!(html.contains(EMPTY_SLIP_PROMPT));
        assert!(!html.contains("Total Stake"));
        assert!(!html.contains("Place Bets"));
        assert!(!html.contains("Clear All"));
    }

    #[test]
    fn test_slip_with_bets_shows_totals() {
        let selected = vec![bet(1), bet(2)];
        let stakes: StakeMap = [(1, "10".to_string()), (2, "-5".to_string())].into();
        let html = render_bet_slip(&BetSlip::new(&selected, &stakes, false), &ValueBetQuery::default());
        assert!(html.contains("Total Stake: <strong>$10.00</strong>"));
        assert!(html.contains("Potential Payout: <strong>$20.00</strong>"));
        assert!(html.contains("Positive only"));
        assert!(html.contains(r#"value="place-bets">Place Bets"#));
        assert!(html.contains(r#"name="remove" value="2""#));
        assert!(html.contains(r#"action="/slip""#));
    }

    #[test]
    fn test_place_button_disabled_without_stake() {
        let selected = vec![bet(1)];
        let stakes = StakeMap::new();
        let html = render_bet_slip(&BetSlip::new(&selected, &stakes, false), &ValueBetQuery::default());
        assert!(html.contains(r#"value="place-bets" disabled>"#));
    }

    #[test]
    fn test_table_marks_selection_and_sort() {
        let rows = vec![bet(1), bet(2)];
        let query = ValueBetQuery {
            sort: SortSpec::default_model(),
            ..Default::default()
        };
        let html = render_opportunities_table(&TableView {
            rows: &rows,
            row_count: 2,
            query: &query,
            selection: &[2],
            loading: false,
        });
        assert!(html.contains(r#"action="/slip/selection""#));
        assert!(html.contains(r#"value="2" checked"#));
        assert!(!html.contains(r#"value="1" checked"#));
        assert!(html.contains("Value (%) ▼"));
        assert!(html.contains("1–2 of 2"));
        assert!(!html.contains("Next"));
    }

    #[test]
    fn test_table_pages_forward() {
        let rows: Vec<_> = (1..=10).map(bet).collect();
        let query = ValueBetQuery::default();
        let html = render_opportunities_table(&TableView {
            rows: &rows,
            row_count: 25,
            query: &query,
            selection: &[],
            loading: false,
        });
        assert!(html.contains("1–10 of 25"));
        assert!(html.contains("page=1"));
        assert!(!html.contains("Previous"));
    }

    #[test]
    fn test_forms_carry_the_listing_query() {
        let query = ValueBetQuery::from_pairs(&[
            ("sport".to_string(), "Tennis".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);
        let selected = vec![bet(1)];
        let stakes = StakeMap::new();
        let html = render_bet_slip(&BetSlip::new(&selected, &stakes, false), &query);
        assert!(html.contains(r#"name="return" value="sport=Tennis&amp;value=&amp;search=&amp;page=2&amp;pageSize=10""#));
    }

    #[test]
    fn test_page_shows_escaped_notice() {
        let html = render_page("", "", "", Some("Error: <b>down</b>"));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("bg-red-100"));
        assert!(html.contains("Error: &lt;b&gt;down&lt;/b&gt;"));

        assert!(!render_page("", "", "", None).contains("role=\"alert\""));
    }
}
