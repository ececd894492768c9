//! Dashboard page rendering - Full page endpoints

use crate::{page_response, year_tabs, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use moneyview_core::aggregation::{GrowthBadge, Metric, MonthlyTrend};
use moneyview_core::CategoryShare;
use moneyview_utils::{escape_html, format_percent, month_label};

pub async fn page_dashboard(state: State<AppState>, headers: HeaderMap) -> Response {
    if state.dashboard.needs_setup() {
        return Redirect::to("/setup").into_response();
    }

    let snapshot = state.dashboard.snapshot();
    let last_refresh = state.dashboard.last_refresh();
    let busy = state.dashboard.is_busy();

    let refresh_bar = format!(
        r#"<div class='flex items-center justify-between mb-6'>
            <h2 class='text-2xl font-bold'>Dashboard</h2>
            <div class='flex items-center gap-3'>
                <span class='text-sm text-gray-500'>{}</span>
                <button class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50 {}' hx-post='/api/refresh' hx-swap='none' hx-indicator='#refresh-spinner'>
                    🔄 Refresh <span id='refresh-spinner' class='htmx-indicator'>…</span>
                </button>
            </div>
        </div>"#,
        match &last_refresh {
            Some(stamp) => format!("Last updated {}", escape_html(stamp)),
            None => "Never refreshed".to_string(),
        },
        if busy { "animate-pulse" } else { "" }
    );

    if snapshot.years.is_empty() {
        let inner_content = format!(
            r#"{}<div class='bg-white rounded-xl shadow-sm p-6 text-center text-gray-500' hx-post='/api/refresh' hx-trigger='load' hx-swap='none'>Loading data…</div>"#,
            refresh_bar
        );
        return Html(page_response(&headers, "Dashboard", "/", &inner_content)).into_response();
    }

    let summary = &snapshot.summary;
    let badge = |metric: Metric| {
        snapshot
            .growth
            .iter()
            .find(|b| b.metric == metric)
            .map(render_badge)
            .unwrap_or_default()
    };

    let inner_content = format!(
        r#"{}
        {}
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-indigo-50 p-4 rounded-lg border border-indigo-200'><p class='text-sm text-indigo-600'>Net ({})</p><p class='text-2xl font-bold text-indigo-700'>{}</p><p class='text-sm text-indigo-500'>{} Saved</p></div>
            <div class='bg-green-50 p-4 rounded-lg border border-green-200'><p class='text-sm text-green-600'>Income</p><p class='text-2xl font-bold text-green-700'>{}</p>{}</div>
            <div class='bg-red-50 p-4 rounded-lg border border-red-200'><p class='text-sm text-red-600'>Expenses</p><p class='text-2xl font-bold text-red-700'>{}</p>{}</div>
            <div class='bg-yellow-50 p-4 rounded-lg border border-yellow-200'><p class='text-sm text-yellow-600'>Investments</p><p class='text-2xl font-bold text-yellow-700'>{}</p>{}</div>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Spending by Category</h3>
                <div class='space-y-3'>{}</div>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>Monthly Trend</h3>
                {}
            </div>
        </div>"#,
        refresh_bar,
        year_tabs(&snapshot.years, snapshot.selection.year.as_deref()),
        escape_html(&summary.label),
        state.money(summary.net),
        format_percent(summary.savings_rate),
        state.money(summary.income),
        badge(Metric::Income),
        state.money(summary.expense),
        badge(Metric::Expense),
        state.money(summary.investment),
        badge(Metric::Investment),
        render_bars(&state, &snapshot.categories),
        render_trend(&state, &snapshot.trend),
    );

    Html(page_response(&headers, "Dashboard", "/", &inner_content)).into_response()
}

fn render_badge(badge: &GrowthBadge) -> String {
    let class = if badge.favorable { "bg-green-100 text-green-700" } else { "bg-red-100 text-red-700" };
    format!(
        "<span class='inline-block mt-1 px-2 py-0.5 rounded text-xs {}'>{} {} vs {}</span>",
        class,
        badge.arrow(),
        format_percent(badge.percent.abs()),
        escape_html(&badge.compared_to)
    )
}

fn render_bars(state: &AppState, categories: &[CategoryShare]) -> String {
    if categories.is_empty() {
        return "<p class='text-gray-500 text-sm'>No expenses.</p>".to_string();
    }
    categories
        .iter()
        .map(|c| {
            format!(
                r#"<div>
                    <div class='flex justify-between text-sm mb-1'><span>{} {}</span><span class='font-medium'>{} ({})</span></div>
                    <div class='h-2 bg-gray-100 rounded'><div class='h-2 rounded' style='width:{:.1}%; background:{}'></div></div>
                </div>"#,
                c.emoji,
                escape_html(&c.category),
                state.money(c.amount),
                format_percent(c.percentage),
                c.percentage,
                c.color
            )
        })
        .collect()
}

fn render_trend(state: &AppState, trend: &MonthlyTrend) -> String {
    let rows: String = (0..12u32)
        .filter(|m| trend.has_activity(*m))
        .map(|m| {
            let i = m as usize;
            format!(
                "<tr class='border-b'><td class='py-1'>{}</td><td class='text-right text-green-700'>{}</td><td class='text-right text-red-700'>{}</td><td class='text-right text-yellow-700'>{}</td></tr>",
                month_label(m),
                state.money(trend.income[i]),
                state.money(trend.expense[i]),
                state.money(trend.investment[i])
            )
        })
        .collect();

    if rows.is_empty() {
        return "<p class='text-gray-500 text-sm'>No dated rows.</p>".to_string();
    }
    format!(
        "<table class='w-full text-sm'><thead><tr class='text-gray-500'><th class='text-left'>Month</th><th class='text-right'>Income</th><th class='text-right'>Expenses</th><th class='text-right'>Investments</th></tr></thead><tbody>{}</tbody></table>",
        rows
    )
}
