//! Settings page rendering - Full page endpoints

use crate::AppState;
use moneyview_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;
    let dashboard = &state.dashboard;

    let source_url = dashboard.source_url().ok().flatten();
    let last_refresh = dashboard.last_refresh();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data Source</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div class='col-span-2'><p class='text-sm text-gray-500'>Sheet URL</p><p class='font-medium break-all'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Last refresh</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Timeout</p><p class='font-medium'>{}s</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Storage</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Work Time</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Period</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Hours per period</p><p class='font-medium'>{:.2}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4 text-red-600'>Danger Zone</h3>
            <p class='text-sm text-gray-500 mb-4'>Forget the sheet URL, the cached rows and the last refresh time.</p>
            <button class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700' hx-post='/api/reset' hx-confirm='Reset all?' hx-swap='none'>Reset</button>
        </div>"#,
        source_url.as_deref().map(escape_html).unwrap_or_else(|| "Not configured".to_string()),
        last_refresh.as_deref().map(escape_html).unwrap_or_else(|| "Never".to_string()),
        config.source.timeout_secs,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.storage.path.display().to_string()),
        config.work_time.period,
        config.work_time.hours()
    );

    axum::response::Html(crate::page_response(&headers, "Settings", "/settings", &inner_content))
}
