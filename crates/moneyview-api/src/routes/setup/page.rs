//! Setup page rendering and form handling

use crate::{form_value, page_response, AppState};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use moneyview_utils::escape_html;
use std::collections::HashMap;

pub async fn page_setup(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let current = state.dashboard.source_url().ok().flatten().unwrap_or_default();
    Html(page_response(&headers, "Setup", "/setup", &setup_form(&state, &current, None)))
}

/// Validate the submitted URL; a valid one is stored and the dashboard loads it
pub async fn setup_submit(state: State<AppState>, headers: HeaderMap, body: String) -> Response {
    let url = form_value(&HashMap::new(), &body, "url").unwrap_or_default();
    match state.dashboard.configure_source(&url) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            log::warn!("Rejected source URL: {}", e);
            let details = e.to_details();
            let mut message = escape_html(&details.message);
            for suggestion in &details.suggestions {
                message.push_str(&format!("<br><span class='text-xs'>{}</span>", escape_html(suggestion)));
            }
            let content = setup_form(&state, &url, Some(&message));
            (StatusCode::BAD_REQUEST, Html(page_response(&headers, "Setup", "/setup", &content))).into_response()
        }
    }
}

fn setup_form(state: &AppState, value: &str, error: Option<&str>) -> String {
    let error = error
        .map(|msg| format!("<div class='mb-4 p-3 rounded-lg bg-red-50 text-red-700 text-sm'>{}</div>", msg))
        .unwrap_or_default();

    format!(
        r#"<div class='max-w-xl mx-auto mt-12 bg-white rounded-xl shadow-sm p-6'>
            <h2 class='text-2xl font-bold mb-2'>Connect your sheet</h2>
            <p class='text-sm text-gray-500 mb-4'>Paste the URL of the published web app. It must start with <code>{}</code>.</p>
            {}
            <form method='post' action='/setup' class='space-y-4'>
                <input type='url' name='url' value='{}' required placeholder='{}/macros/s/…/exec' class='w-full px-3 py-2 border rounded-lg'>
                <button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save and load</button>
            </form>
        </div>"#,
        escape_html(&state.config.source.allowed_prefix),
        error,
        escape_html(value),
        escape_html(&state.config.source.allowed_prefix)
    )
}
