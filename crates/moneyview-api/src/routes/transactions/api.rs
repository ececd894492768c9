//! Transaction API endpoints - JSON API and HTMX partials
//!
//! The search query only filters the listing; totals stay untouched.

use super::page::render_transaction_list;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use moneyview_core::TransactionsResponse;
use std::collections::HashMap;

/// Visible transactions matching `q`, or the stored search query
pub async fn api_transactions(
    state: State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Json<TransactionsResponse> {
    match query.get("q") {
        Some(q) => Json(state.dashboard.transactions(q)),
        None => Json(state.dashboard.visible_transactions()),
    }
}

/// Store the search query and render the matching list
pub async fn htmx_transactions_list(
    state: State<AppState>,
    query: Query<HashMap<String, String>>,
) -> Html<String> {
    let search = query.get("q").cloned().unwrap_or_default();
    state.dashboard.set_search_query(&search);
    let listing = state.dashboard.visible_transactions();
    Html(render_transaction_list(&state, &listing))
}
