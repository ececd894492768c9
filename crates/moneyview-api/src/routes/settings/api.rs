//! Settings API endpoints - JSON API

use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// Active configuration plus the dashboard status
pub async fn api_settings(state: State<AppState>) -> Json<Value> {
    let dashboard = &state.dashboard;
    Json(json!({
        "config": &state.config,
        "status": {
            "configured": !dashboard.needs_setup(),
            "source_url": dashboard.source_url().ok().flatten(),
            "last_refresh": dashboard.last_refresh(),
            "busy": dashboard.is_busy(),
            "revision": state.revision(),
        }
    }))
}
