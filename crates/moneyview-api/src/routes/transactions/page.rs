//! Transaction list rendering

use crate::AppState;
use moneyview_core::reports::TransactionItem;
use moneyview_core::TransactionsResponse;
use moneyview_utils::escape_html;

pub fn render_transaction_list(state: &AppState, listing: &TransactionsResponse) -> String {
    if listing.transactions.is_empty() {
        return "<p class='text-gray-500 text-sm'>No transactions.</p>".to_string();
    }
    listing
        .transactions
        .iter()
        .map(|item| render_item(state, item))
        .collect()
}

fn render_item(state: &AppState, item: &TransactionItem) -> String {
    let color = match item.bucket.as_str() {
        "income" => "#10b981",
        "investment" => "#fbbf24",
        _ => "#ef4444",
    };
    let category = match &item.subcategory {
        Some(sub) => format!("{} · {}", escape_html(&item.category), escape_html(sub)),
        None => escape_html(&item.category),
    };

    format!(
        r#"<div class='flex items-center justify-between p-3 bg-gray-50 rounded-lg border-l-4' style='border-color:{}'>
            <div><p class='font-medium'>{} {}</p><p class='text-xs text-gray-500'>{} · {}</p></div>
            <span class='font-medium' style='color:{}'>{}</span>
        </div>"#,
        color,
        item.emoji,
        escape_html(&item.description),
        escape_html(&item.date),
        category,
        color,
        state.money(item.amount)
    )
}
