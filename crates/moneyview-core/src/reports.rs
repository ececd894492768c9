//! Report structures for API responses

use serde::{Deserialize, Serialize};

use crate::aggregation::{
    BiggestExpense, CategoryShare, GrowthBadge, MonthlyTrend, SubcategoryTotal, WorkTime,
};

/// Year totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Selected year, or "All"
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub investment: f64,
    pub net: f64,
    /// Net over income, as a percentage
    pub savings_rate: f64,
    pub transaction_count: usize,
}

/// One card of the insights view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCard {
    pub category: String,
    pub emoji: String,
    pub color: String,
    pub total: f64,
    /// Subcategories, largest first
    pub subcategories: Vec<SubcategoryTotal>,
    pub biggest: BiggestExpense,
    /// Labor time the category total represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_time: Option<WorkTime>,
    /// Labor time the biggest single expense represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biggest_work_time: Option<WorkTime>,
}

/// Current selection as seen by renderers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionInfo {
    /// `None` until data is loaded
    pub year: Option<String>,
    /// `None` means every month
    pub month: Option<u32>,
    pub show_history: bool,
    pub search_query: String,
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub selection: SelectionInfo,
    /// Available years, most recent first
    pub years: Vec<String>,
    pub summary: YearSummary,
    /// Comparisons against the previous year; empty when there is none
    pub growth: Vec<GrowthBadge>,
    pub categories: Vec<CategoryShare>,
    pub insights: Vec<InsightCard>,
    pub trend: MonthlyTrend,
    /// Months (zero-based) with recorded income
    pub income_months: Vec<u32>,
}

/// A listed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub date: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub description: String,
    pub amount: f64,
    /// income, investment or expense
    pub bucket: String,
    pub emoji: String,
}

/// Transactions list response for API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionItem>,
    pub total_count: usize,
    pub query: String,
}
