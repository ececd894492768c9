//! Insights API endpoints - JSON API

use crate::{action_response, form_value, ApiError, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use moneyview_core::MonthSelection;
use serde_json::json;
use std::collections::HashMap;

/// Select a month (`month=0`..`11` or `month=All`)
pub async fn api_select_month(
    state: State<AppState>,
    headers: HeaderMap,
    query: Query<HashMap<String, String>>,
    body: String,
) -> ApiResult<Response> {
    let raw = form_value(&query, &body, "month").ok_or_else(|| ApiError::bad_request("missing 'month'"))?;
    let month: MonthSelection = raw.parse()?;
    state.dashboard.select_month(month);
    Ok(action_response(&headers, json!({ "success": true, "month": month.as_month() })))
}

pub async fn api_toggle_history(state: State<AppState>, headers: HeaderMap) -> Response {
    let show_history = state.dashboard.toggle_history();
    action_response(&headers, json!({ "success": true, "show_history": show_history }))
}
