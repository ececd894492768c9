//! Dashboard API endpoints - JSON API
//!
//! Endpoints:
//! - api_snapshot: Everything the dashboard renders (JSON)
//! - api_years: Available years (JSON)
//! - api_select_year: Change the selected year
//! - api_refresh: Fetch fresh rows from the source
//! - api_reset: Forget the source, cache and data

use crate::{action_response, form_value, is_htmx_request, ApiError, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use axum::Json;
use moneyview_core::{CoreError, RefreshOutcome, Snapshot, YearSelection};
use serde_json::json;
use std::collections::HashMap;

pub async fn api_snapshot(state: State<AppState>) -> Json<Snapshot> {
    Json(state.dashboard.snapshot())
}

pub async fn api_years(state: State<AppState>) -> Json<Vec<String>> {
    Json(state.dashboard.view().years())
}

/// Select a year (`year=2023` or `year=All`)
pub async fn api_select_year(
    state: State<AppState>,
    headers: HeaderMap,
    query: Query<HashMap<String, String>>,
    body: String,
) -> ApiResult<Response> {
    let raw = form_value(&query, &body, "year").ok_or_else(|| ApiError::bad_request("missing 'year'"))?;
    let year: YearSelection = raw.parse()?;
    state.dashboard.select_year(year.clone())?;
    Ok(action_response(&headers, json!({ "success": true, "year": year.to_string() })))
}

/// Refresh from the configured source; 409 when none is configured
pub async fn api_refresh(state: State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let outcome = state.dashboard.refresh().await;
    if outcome == RefreshOutcome::NotConfigured {
        return Err(CoreError::NotConfigured.into());
    }
    Ok(action_response(&headers, serde_json::to_value(&outcome).unwrap_or_default()))
}

pub async fn api_reset(state: State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    state.dashboard.reset()?;
    let mut response = action_response(&HeaderMap::new(), json!({ "success": true }));
    if is_htmx_request(&headers) {
        response
            .headers_mut()
            .insert("hx-redirect", HeaderValue::from_static("/setup"));
    }
    Ok(response)
}
