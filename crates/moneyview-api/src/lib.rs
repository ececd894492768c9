//! HTTP dashboard server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: Year totals, growth badges, category bars, refresh
//! - routes::insights: Month tabs, insight cards, history toggle
//! - routes::transactions: Transaction list and search
//! - routes::setup: Source URL setup
//! - routes::settings: Configuration display and reset
//!
//! Pages only render what the core snapshot contains; every selection
//! change goes through the dashboard controller.

pub mod error;
pub mod routes;

use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use moneyview_config::{Config, CurrencyConfig};
use moneyview_core::Dashboard;
use moneyview_utils::{escape_html, format_currency};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub config: Config,
    /// Bumped on every view-state change
    pub revision: Arc<AtomicU64>,
}

impl AppState {
    /// Wrap a dashboard and subscribe to its changes
    pub fn new(dashboard: Arc<Dashboard>, config: Config) -> Self {
        let revision = Arc::new(AtomicU64::new(0));
        let counter = revision.clone();
        dashboard.subscribe(move |_, change| {
            let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
            log::debug!("View changed: {} (revision {})", change, current);
            Ok(())
        });
        Self { dashboard, config, revision }
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Format an amount with the configured currency settings
    pub fn money(&self, value: f64) -> String {
        money(&self.config.currency, value)
    }
}

/// Format an amount with the given currency settings
pub fn money(currency: &CurrencyConfig, value: f64) -> String {
    format_currency(
        value,
        &currency.symbol,
        &currency.thousands_separator,
        &currency.decimal_separator,
        currency.decimal_places,
    )
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::dashboard::{api_refresh, api_reset, api_select_year, api_snapshot, api_years, page_dashboard};
    use routes::insights::{api_select_month, api_toggle_history, page_insights};
    use routes::settings::{api_settings, page_settings};
    use routes::setup::{page_setup, setup_submit};
    use routes::transactions::{api_transactions, htmx_transactions_list};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/snapshot", get(api_snapshot))
        .route("/api/years", get(api_years))
        .route("/api/transactions", get(api_transactions))
        .route("/api/settings", get(api_settings))
        .route("/api/year", post(api_select_year))
        .route("/api/month", post(api_select_month))
        .route("/api/history/toggle", post(api_toggle_history))
        .route("/api/refresh", post(api_refresh))
        .route("/api/reset", post(api_reset))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/insights", get(page_insights))
        .route("/setup", get(page_setup).post(setup_submit))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/transactions/list", get(htmx_transactions_list))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Request helpers ====================

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Read a parameter from the query string, a form body or a JSON body
pub fn form_value(query: &HashMap<String, String>, body: &str, key: &str) -> Option<String> {
    if let Some(value) = query.get(key) {
        return Some(value.clone());
    }

    let body = body.trim();
    if body.starts_with('{') {
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        return match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        };
    }

    body.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k != key {
            return None;
        }
        let v = v.replace('+', " ");
        Some(urlencoding::decode(&v).map(|s| s.into_owned()).unwrap_or(v))
    })
}

/// Response to a state-changing request: HTMX callers reload the page,
/// everyone else gets JSON
pub fn action_response(headers: &HeaderMap, json: serde_json::Value) -> Response {
    let mut response = axum::Json(json).into_response();
    if is_htmx_request(headers) {
        response
            .headers_mut()
            .insert("hx-refresh", HeaderValue::from_static("true"));
    }
    response
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Money Manager</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard", "📊"),
        ("/insights", "Insights", "🔍"),
        ("/settings", "Settings", "⚙️"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Money Manager</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, icon) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Year tabs shared by the dashboard and insights pages
pub fn year_tabs(years: &[String], selected: Option<&str>) -> String {
    let mut tabs: Vec<String> = years
        .iter()
        .map(|year| year_tab(year, selected == Some(year.as_str())))
        .collect();
    tabs.push(year_tab("All", selected == Some("All")));
    format!("<div class='flex flex-wrap gap-2 mb-6'>{}</div>", tabs.join(""))
}

fn year_tab(label: &str, active: bool) -> String {
    let class = if active { "bg-indigo-600 text-white" } else { "bg-white text-gray-700 hover:bg-gray-100" };
    format!(
        r#"<button class='px-4 py-1.5 rounded-full border text-sm {}' hx-post='/api/year' hx-vals='{{"year": "{}"}}' hx-swap='none'>{}</button>"#,
        class,
        escape_html(label),
        escape_html(label)
    )
}

// ==================== Server ====================

/// Start the HTTP server
pub async fn start_server(config: Config, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(dashboard, config);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Money Manager on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /insights (Category insights)");
    log::info!("  - /setup (Data source setup)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}

// ==================== Tests ====================
