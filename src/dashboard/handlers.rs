//! HTTP route handlers for the dashboard.
//!
//! This module contains the JSON listing endpoint, the server-rendered HTML
//! page with its bet slip forms, and the health check.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json, Redirect},
    Form,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::dashboard::render::RETURN_FIELD;
use crate::dashboard::session::SharedPage;
use crate::dashboard::state::DashboardState;
use crate::query::ValueBetQuery;

/// Query parameter carrying a one-off banner for the page
pub const NOTICE_PARAM: &str = "notice";

// ============================================================================
// API HANDLERS (JSON)
// ============================================================================

/// Filtered, sorted and paginated opportunities. Always 200.
pub async fn api_value_bets(
    State(state): State<Arc<DashboardState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let query = ValueBetQuery::from_pairs(&pairs);
    let response = state.query_value_bets(&query);

    debug!(
        "value-bets: sport={:?} min_value={:?} search={:?} sort={:?} page={} size={} -> {}/{}",
        query.sport,
        query.min_value,
        query.search,
        query.sort.first(),
        query.pagination.page,
        query.pagination.page_size,
        response.rows.len(),
        response.total_row_count
    );

    Json(response)
}

// ============================================================================
// HTML PAGE HANDLERS
// ============================================================================

fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Redirect to the listing a form was rendered for, optionally with a notice
fn back_to_page(return_query: Option<&str>, notice: Option<&str>) -> Redirect {
    let kept = url::form_urlencoded::parse(return_query.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k != NOTICE_PARAM);

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(kept);
    if let Some(notice) = notice {
        serializer.append_pair(NOTICE_PARAM, notice);
    }

    let encoded = serializer.finish();
    if encoded.is_empty() {
        Redirect::to("/")
    } else {
        Redirect::to(&format!("/?{}", encoded))
    }
}

/// Server-rendered dashboard for the query in the URL
pub async fn index_page(
    State(page): State<SharedPage>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let query = ValueBetQuery::from_pairs(&pairs);

    let mut page = page.lock().await;
    page.navigate(&query).await;
    Html(page.render_with_notice(field(&pairs, NOTICE_PARAM)))
}

/// Table form: the ticked rows become the selection
pub async fn update_selection(
    State(page): State<SharedPage>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Redirect {
    let ids: Vec<u32> = pairs
        .iter()
        .filter(|(k, _)| k == "selection")
        .filter_map(|(_, v)| v.parse().ok())
        .collect();
    debug!("slip selection: {:?}", ids);

    page.lock().await.set_selection(ids);
    back_to_page(field(&pairs, RETURN_FIELD), None)
}

/// Slip form: stake edits first, then whichever button was pressed
pub async fn update_slip(
    State(page): State<SharedPage>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Redirect {
    let mut page = page.lock().await;

    for (key, raw) in &pairs {
        let Some(id) = key.strip_prefix("stake-").and_then(|id| id.parse::<u32>().ok()) else {
            continue;
        };
        let current = page.stakes().get(&id).map(String::as_str).unwrap_or_default();
        if page.selection().contains(&id) && current != raw {
            page.set_stake(id, raw.as_str());
        }
    }

    let removed = field(&pairs, "remove").and_then(|id| id.parse::<u32>().ok());
    let notice = match (removed, field(&pairs, "action")) {
        (Some(id), _) => {
            page.remove_bet(id);
            None
        }
        (None, Some("clear-all")) => {
            page.clear_all();
            None
        }
        (None, Some("place-bets")) => {
            let outcome = page.place_bets().await;
            info!("{}", outcome.notice());
            Some(outcome.notice())
        }
        _ => None,
    };

    back_to_page(field(&pairs, RETURN_FIELD), notice.as_deref())
}

// ============================================================================
// HEALTH CHECK
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub requests_served: u64,
}

pub async fn health_check(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        requests_served: state.requests_served(),
    })
}
