//! Insights page rendering - Full page endpoints

use crate::routes::transactions::render_transaction_list;
use crate::{page_response, year_tabs, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use moneyview_core::reports::InsightCard;
use moneyview_core::Snapshot;
use moneyview_utils::{escape_html, month_label};

pub async fn page_insights(state: State<AppState>, headers: HeaderMap) -> Response {
    if state.dashboard.needs_setup() {
        return Redirect::to("/setup").into_response();
    }

    let snapshot = state.dashboard.snapshot();
    let history = if snapshot.selection.show_history {
        let listing = state.dashboard.visible_transactions();
        render_transaction_list(&state, &listing)
    } else {
        String::new()
    };

    let cards: String = snapshot.insights.iter().map(|card| render_card(&state, card)).collect();
    let toggle_label = if snapshot.selection.show_history {
        "📁 Hide Transactions".to_string()
    } else {
        format!(
            "📦 Show {} Transactions",
            if snapshot.selection.month.is_none() { "Year" } else { "Month" }
        )
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Insights</h2></div>
        {}
        {}
        <div class='grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4 mb-6'>{}</div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <button class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50' hx-post='/api/history/toggle' hx-swap='none'>{}</button>
                <input type='search' name='q' value='{}' placeholder='Search transactions…' class='px-3 py-1.5 text-sm border rounded-lg w-64 {}'
                    hx-get='/transactions/list' hx-trigger='keyup changed delay:300ms, search' hx-target='#data-container'>
            </div>
            <div id='data-container' class='grid grid-cols-1 md:grid-cols-2 gap-3'>{}</div>
        </div>"#,
        year_tabs(&snapshot.years, snapshot.selection.year.as_deref()),
        month_tabs(&snapshot),
        if cards.is_empty() {
            "<p class='text-gray-500'>No expenses in this period.</p>".to_string()
        } else {
            cards
        },
        toggle_label,
        escape_html(&snapshot.selection.search_query),
        if snapshot.selection.show_history { "" } else { "hidden" },
        history
    );

    Html(page_response(&headers, "Insights", "/insights", &inner_content)).into_response()
}

/// Month tabs; months with income carry a marker
fn month_tabs(snapshot: &Snapshot) -> String {
    let selected = snapshot.selection.month;
    let mut tabs = vec![month_tab("All", "All Months", selected.is_none(), false)];
    for m in 0..12u32 {
        tabs.push(month_tab(
            &m.to_string(),
            month_label(m),
            selected == Some(m),
            snapshot.income_months.contains(&m),
        ));
    }
    format!("<div class='flex flex-wrap gap-2 mb-6'>{}</div>", tabs.join(""))
}

fn month_tab(value: &str, label: &str, active: bool, has_income: bool) -> String {
    let class = if active { "bg-indigo-600 text-white" } else { "bg-white text-gray-700 hover:bg-gray-100" };
    format!(
        r#"<button class='px-3 py-1 rounded-full border text-sm {}' hx-post='/api/month' hx-vals='{{"month": "{}"}}' hx-swap='none'>{}{}</button>"#,
        class,
        value,
        label,
        if has_income { " <span class='text-green-500' title='Income received'>●</span>" } else { "" }
    )
}

fn render_card(state: &AppState, card: &InsightCard) -> String {
    let subcategories: String = card
        .subcategories
        .iter()
        .map(|s| {
            format!(
                "<div class='flex justify-between text-sm py-1'><span class='text-gray-600'>{}</span><span>{}</span></div>",
                escape_html(&s.name),
                state.money(s.amount)
            )
        })
        .collect();

    let work_time = card
        .work_time
        .map(|w| format!("<span class='text-xs text-gray-500' title='Work time equivalent'>⏱ {} of work</span>", w))
        .unwrap_or_default();
    let biggest_work_time = card
        .biggest_work_time
        .map(|w| format!(" <span class='text-xs text-gray-500'>⏱ {}</span>", w))
        .unwrap_or_default();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-4 border-t-4' style='border-color:{}'>
            <div class='flex justify-between items-baseline mb-2'><h4 class='font-semibold'>{} {}</h4><span class='font-medium'>{}</span></div>
            <div class='mb-2'>{}</div>
            <div class='divide-y'>{}</div>
            <div class='mt-3 p-2 bg-gray-50 rounded text-sm'>
                <p class='text-xs uppercase text-gray-400'>Biggest Spend</p>
                <p class='flex justify-between'><span>{}</span><span class='font-medium'>{}{}</span></p>
            </div>
        </div>"#,
        card.color,
        card.emoji,
        escape_html(&card.category),
        state.money(card.total),
        work_time,
        subcategories,
        escape_html(&card.biggest.description),
        state.money(card.biggest.amount),
        biggest_work_time
    )
}
