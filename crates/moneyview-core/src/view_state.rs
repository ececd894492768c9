//! View state
//!
//! Owns the loaded rows and the current selection (year, month, history
//! visibility, search query). Every mutation goes through a named
//! transition that notifies subscribers synchronously, in subscription
//! order. A subscriber that returns an error or panics is logged and the
//! remaining subscribers still run.

use moneyview_config::{WorkPeriod, WorkTimeConfig};
use moneyview_parser::Row;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

use crate::aggregation::{
    breakdown, monthly_trend, partition_by_year, rank_categories, summarize, work_time_equivalent,
    GrowthBadge, Metric, MonthlyTrend, Summary, YearlyPartition,
};
use crate::classifier::{classify, emoji_for, CategoryPalette};
use crate::error::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::reports::{InsightCard, SelectionInfo, Snapshot, TransactionItem, TransactionsResponse, YearSummary};

/// Sentinel label for "every year" / "every month"
pub const ALL_LABEL: &str = "All";

/// Selected year
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum YearSelection {
    All,
    Year(String),
}

impl std::str::FromStr for YearSelection {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_LABEL) {
            Ok(YearSelection::All)
        } else if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            Ok(YearSelection::Year(s.to_string()))
        } else {
            Err(CoreError::InvalidSelection { value: s.to_string() })
        }
    }
}

impl std::fmt::Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearSelection::All => write!(f, "{}", ALL_LABEL),
            YearSelection::Year(y) => write!(f, "{}", y),
        }
    }
}

/// Selected month, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthSelection {
    #[default]
    All,
    Month(u32),
}

impl MonthSelection {
    /// Month selection, `None` when outside 0..=11
    pub fn month(month: u32) -> Option<Self> {
        (month < 12).then_some(MonthSelection::Month(month))
    }

    /// Zero-based month, `None` for every month
    pub fn as_month(&self) -> Option<u32> {
        match self {
            MonthSelection::All => None,
            MonthSelection::Month(m) => Some(*m),
        }
    }
}

impl std::str::FromStr for MonthSelection {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_LABEL) {
            return Ok(MonthSelection::All);
        }
        s.parse::<u32>()
            .ok()
            .and_then(MonthSelection::month)
            .ok_or_else(|| CoreError::InvalidSelection { value: s.to_string() })
    }
}

impl std::fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthSelection::All => write!(f, "{}", ALL_LABEL),
            MonthSelection::Month(m) => write!(f, "{}", m),
        }
    }
}

/// Kind of transition a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    DataLoaded,
    YearSelected,
    MonthSelected,
    HistoryToggled,
    SearchChanged,
    Cleared,
}

impl std::fmt::Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StateChange::DataLoaded => "data_loaded",
            StateChange::YearSelected => "year_selected",
            StateChange::MonthSelected => "month_selected",
            StateChange::HistoryToggled => "history_toggled",
            StateChange::SearchChanged => "search_changed",
            StateChange::Cleared => "cleared",
        };
        write!(f, "{}", name)
    }
}

/// Failure reported by a subscriber callback
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubscriberError {
    pub message: String,
}

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// State-change callback
pub type Subscriber = Box<dyn Fn(&ViewState, StateChange) -> Result<(), SubscriberError> + Send + Sync>;

/// Current selection plus the rows it is derived from
pub struct ViewState {
    rows: Vec<Row>,
    partition: YearlyPartition,
    palette: CategoryPalette,
    selected_year: Option<YearSelection>,
    selected_month: MonthSelection,
    show_history: bool,
    search_query: String,
    subscribers: Vec<Subscriber>,
    error_logger: Box<dyn ErrorLogger>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("rows", &self.rows.len())
            .field("selected_year", &self.selected_year)
            .field("selected_month", &self.selected_month)
            .field("show_history", &self.show_history)
            .field("search_query", &self.search_query)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::with_error_logger(Box::new(DefaultErrorLogger))
    }

    /// View state reporting subscriber failures to a custom logger
    pub fn with_error_logger(error_logger: Box<dyn ErrorLogger>) -> Self {
        Self {
            rows: Vec::new(),
            partition: YearlyPartition::default(),
            palette: CategoryPalette::new(),
            selected_year: None,
            selected_month: MonthSelection::All,
            show_history: false,
            search_query: String::new(),
            subscribers: Vec::new(),
            error_logger,
        }
    }

    // ==================== Subscriptions ====================

    /// Register a callback run after every transition
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&ViewState, StateChange) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    fn notify(&self, change: StateChange) {
        for (index, subscriber) in self.subscribers.iter().enumerate() {
            let failure = match catch_unwind(AssertUnwindSafe(|| subscriber(self, change))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.message,
                Err(panic) => panic_message(panic.as_ref()),
            };
            let context = ErrorContext::new("notify")
                .with_data("change", serde_json::json!(change.to_string()))
                .with_data("subscriber", serde_json::json!(index));
            self.error_logger
                .log_error(&CoreError::SubscriberFailed { message: failure }, &context);
        }
    }

    // ==================== Transitions ====================

    /// Replace the row set.
    ///
    /// The selected year survives when it still exists (or is "All");
    /// otherwise the most recent year is selected. The month resets to
    /// "All" only when no data was loaded before.
    pub fn load_data(&mut self, rows: Vec<Row>) {
        let had_data = self.has_data();
        self.partition = partition_by_year(&rows);
        self.rows = rows;

        let keep_year = match &self.selected_year {
            Some(YearSelection::All) => true,
            Some(YearSelection::Year(year)) => self.partition.contains(year),
            None => false,
        };
        if !keep_year {
            self.selected_year = self.partition.latest_year().map(YearSelection::Year);
        }
        if !had_data {
            self.selected_month = MonthSelection::All;
        }

        log::debug!(
            "Loaded {} rows ({} dated) across {} years, selected {:?}",
            self.rows.len(),
            self.partition.row_count(),
            self.partition.years().len(),
            self.selected_year
        );
        self.notify(StateChange::DataLoaded);
    }

    /// Select a year and reset the month to "All"
    pub fn select_year(&mut self, year: YearSelection) {
        self.selected_year = Some(year);
        self.selected_month = MonthSelection::All;
        self.notify(StateChange::YearSelected);
    }

    /// Select a month within the current year
    pub fn select_month(&mut self, month: MonthSelection) {
        self.selected_month = month;
        self.notify(StateChange::MonthSelected);
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.notify(StateChange::HistoryToggled);
    }

    /// Store the transaction search. Aggregates are unaffected.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.notify(StateChange::SearchChanged);
    }

    /// Drop every row and reset the selection
    pub fn clear(&mut self) {
        self.rows.clear();
        self.partition = YearlyPartition::default();
        self.selected_year = None;
        self.selected_month = MonthSelection::All;
        self.show_history = false;
        self.search_query.clear();
        self.notify(StateChange::Cleared);
    }

    // ==================== Queries ====================

    pub fn selected_year(&self) -> Option<&YearSelection> {
        self.selected_year.as_ref()
    }

    pub fn selected_month(&self) -> MonthSelection {
        self.selected_month
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn has_data(&self) -> bool {
        !self.partition.is_empty()
    }

    pub fn has_year(&self, year: &str) -> bool {
        self.partition.contains(year)
    }

    /// Available years, most recent first
    pub fn years(&self) -> Vec<String> {
        self.partition.years()
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    /// Rows of the selected year; every row for "All"
    pub fn current_year_rows(&self) -> &[Row] {
        match &self.selected_year {
            Some(YearSelection::Year(year)) => self.partition.get(year).unwrap_or(&[]),
            Some(YearSelection::All) => &self.rows,
            None => &[],
        }
    }

    /// Rows of the selected year restricted to the selected month
    pub fn filtered_rows(&self) -> Vec<&Row> {
        let rows = self.current_year_rows();
        match self.selected_month {
            MonthSelection::All => rows.iter().collect(),
            MonthSelection::Month(m) => rows.iter().filter(|r| r.month() == Some(m)).collect(),
        }
    }

    /// Filtered rows matching the stored search query
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.rows_matching(&self.search_query)
    }

    /// Filtered rows matching an arbitrary query
    pub fn rows_matching(&self, query: &str) -> Vec<&Row> {
        self.filtered_rows().into_iter().filter(|r| r.matches(query)).collect()
    }

    /// Transaction listing for a query
    pub fn transactions(&self, query: &str) -> TransactionsResponse {
        Self::listing(self.rows_matching(query), query)
    }

    /// Transaction listing for the stored search query
    pub fn visible_transactions(&self) -> TransactionsResponse {
        Self::listing(self.visible_rows(), &self.search_query)
    }

    fn listing(rows: Vec<&Row>, query: &str) -> TransactionsResponse {
        let transactions: Vec<TransactionItem> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| TransactionItem {
                date: row.display_date().to_string(),
                category: row.category.clone(),
                subcategory: row.subcategory.clone(),
                description: row
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Entry {}", i + 1)),
                amount: row.amount,
                bucket: classify(&row.category).to_string(),
                emoji: emoji_for(&row.category).to_string(),
            })
            .collect();

        TransactionsResponse {
            total_count: transactions.len(),
            transactions,
            query: query.to_string(),
        }
    }

    /// Totals of the selected year
    pub fn year_summary(&self) -> Summary {
        summarize(self.current_year_rows())
    }

    /// Growth badges against the previous calendar year.
    ///
    /// Empty for "All" or when the previous year has no data.
    pub fn growth_badges(&self, current: &Summary) -> Vec<GrowthBadge> {
        let Some(YearSelection::Year(year)) = &self.selected_year else {
            return Vec::new();
        };
        let Some(previous_year) = year.parse::<i64>().ok().map(|y| (y - 1).to_string()) else {
            return Vec::new();
        };
        let Some(previous_rows) = self.partition.get(&previous_year) else {
            return Vec::new();
        };
        let previous = summarize(previous_rows);

        [
            GrowthBadge::compute(Metric::Income, current.income, previous.income, &previous_year),
            GrowthBadge::compute(Metric::Expense, current.expense, previous.expense, &previous_year),
            GrowthBadge::compute(Metric::Investment, current.investment, previous.investment, &previous_year),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Monthly trend of the selected year
    pub fn trend(&self) -> MonthlyTrend {
        match &self.selected_year {
            Some(YearSelection::Year(year)) => monthly_trend(self.current_year_rows(), Some(year.as_str())),
            _ => monthly_trend(self.current_year_rows(), None),
        }
    }

    /// Income the work-time conversion is based on
    fn period_income(&self, summary: &Summary, trend: &MonthlyTrend, config: &WorkTimeConfig) -> f64 {
        let years = match &self.selected_year {
            Some(YearSelection::All) => self.partition.years().len().max(1) as f64,
            _ => 1.0,
        };
        match config.period {
            WorkPeriod::Yearly => summary.income / years,
            WorkPeriod::Monthly => match self.selected_month {
                MonthSelection::Month(m) => trend.income.get(m as usize).copied().unwrap_or(0.0) / years,
                MonthSelection::All => summary.income / (12.0 * years),
            },
        }
    }

    /// Recompute everything the presentation layer renders
    pub fn snapshot(&self, work_time: &WorkTimeConfig) -> Snapshot {
        let summary = self.year_summary();
        let trend = self.trend();
        let growth = self.growth_badges(&summary);
        let categories = rank_categories(&summary, &self.palette);

        let income = self.period_income(&summary, &trend, work_time);
        let filtered = self.filtered_rows();
        let insights = breakdown(filtered.iter().copied())
            .groups
            .into_iter()
            .map(|group| {
                let total = group.total();
                InsightCard {
                    emoji: emoji_for(&group.category).to_string(),
                    color: self.palette.color_for(&group.category).to_string(),
                    total,
                    subcategories: group.ranked_subcategories().into_iter().cloned().collect(),
                    work_time: work_time_equivalent(total, income, work_time.hours()),
                    biggest_work_time: work_time_equivalent(
                        group.biggest.amount,
                        income,
                        work_time.hours(),
                    ),
                    biggest: group.biggest,
                    category: group.category,
                }
            })
            .collect();

        Snapshot {
            selection: SelectionInfo {
                year: self.selected_year.as_ref().map(ToString::to_string),
                month: self.selected_month.as_month(),
                show_history: self.show_history,
                search_query: self.search_query.clone(),
            },
            years: self.years(),
            summary: YearSummary {
                label: self
                    .selected_year
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                income: summary.income,
                expense: summary.expense,
                investment: summary.investment,
                net: summary.net(),
                savings_rate: summary.savings_rate() * 100.0,
                transaction_count: self.current_year_rows().len(),
            },
            growth,
            categories,
            insights,
            income_months: (0..12).filter(|m| trend.has_income(*m)).collect(),
            trend,
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{Direction, WorkTime};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn rows(values: Value) -> Vec<Row> {
        moneyview_parser::ingest_rows(values.as_array().unwrap()).rows
    }

    fn scenario() -> Vec<Row> {
        rows(json!([
            ["2023-01-10", "Depositos", "", "1000,00", "Salary"],
            ["2023-01-15", "Comida", "Supermercado", "50,00", "Groceries"],
            ["2023-02-01", "Investimentos", "", "200,00", "ETF"]
        ]))
    }

    fn two_years() -> Vec<Row> {
        rows(json!([
            ["2022-01-10", "Depositos", "", "800,00", "Salary"],
            ["2022-01-15", "Comida", "", "100,00", "Groceries"],
            ["2022-03-01", "Investimentos", "", "200,00", "ETF"],
            ["2023-01-10", "Depositos", "", "1000,00", "Salary"],
            ["2023-01-15", "Comida", "", "80,00", "Groceries"],
            ["2023-02-20", "Lazer", "Cinema", "20,00", "Movie"]
        ]))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut state = ViewState::new();
        state.load_data(scenario());
        state.select_year(YearSelection::Year("2023".to_string()));

        let snapshot = state.snapshot(&WorkTimeConfig::default());
        assert_eq!(snapshot.summary.income, 1000.0);
        assert_eq!(snapshot.summary.expense, 50.0);
        assert_eq!(snapshot.summary.investment, 200.0);
        assert_eq!(snapshot.summary.net, 950.0);
        assert!((snapshot.summary.savings_rate - 95.0).abs() < 1e-9);

        assert_eq!(snapshot.insights.len(), 1);
        assert_eq!(snapshot.insights[0].category, "Comida");
        assert_eq!(snapshot.insights[0].total, 50.0);
        assert_eq!(snapshot.insights[0].emoji, "🍔");

        assert!(snapshot.trend.has_income(0));
        assert_eq!(snapshot.income_months, vec![0]);
    }

    #[test]
    fn test_load_selects_most_recent_year() {
        let mut state = ViewState::new();
        assert!(state.selected_year().is_none());
        state.load_data(two_years());
        assert_eq!(state.selected_year(), Some(&YearSelection::Year("2023".to_string())));
        assert_eq!(state.years(), vec!["2023", "2022"]);
    }

    #[test]
    fn test_reload_preserves_existing_year_and_month() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        state.select_year(YearSelection::Year("2022".to_string()));
        state.select_month(MonthSelection::Month(0));

        state.load_data(two_years());
        assert_eq!(state.selected_year(), Some(&YearSelection::Year("2022".to_string())));
        assert_eq!(state.selected_month(), MonthSelection::Month(0));
    }

    #[test]
    fn test_reload_replaces_missing_year() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        state.select_year(YearSelection::Year("2022".to_string()));

        state.load_data(scenario());
        assert_eq!(state.selected_year(), Some(&YearSelection::Year("2023".to_string())));
    }

    #[test]
    fn test_all_years_survives_reload() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        state.select_year(YearSelection::All);
        state.load_data(scenario());
        assert_eq!(state.selected_year(), Some(&YearSelection::All));
        assert_eq!(state.current_year_rows().len(), 3);
    }

    #[test]
    fn test_select_year_resets_month() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        state.select_month(MonthSelection::Month(1));
        assert_eq!(state.filtered_rows().len(), 1);

        state.select_year(YearSelection::Year("2022".to_string()));
        assert_eq!(state.selected_month(), MonthSelection::All);
        assert_eq!(state.filtered_rows().len(), 3);
    }

    #[test]
    fn test_month_filter_limits_insights_not_totals() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        state.select_month(MonthSelection::Month(1));

        let snapshot = state.snapshot(&WorkTimeConfig::default());
        assert_eq!(snapshot.summary.expense, 100.0);
        assert_eq!(snapshot.insights.len(), 1);
        assert_eq!(snapshot.insights[0].category, "Lazer");
    }

    #[test]
    fn test_growth_badges() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        let snapshot = state.snapshot(&WorkTimeConfig::default());

        assert_eq!(snapshot.growth.len(), 3);
        let income = &snapshot.growth[0];
        assert_eq!(income.metric, Metric::Income);
        assert_eq!(income.percent, 25.0);
        assert!(income.favorable);
        assert_eq!(income.compared_to, "2022");

        let investment = &snapshot.growth[2];
        assert_eq!(investment.direction, Direction::Down);
        assert!(!investment.favorable);

        state.select_year(YearSelection::Year("2022".to_string()));
        assert!(state.snapshot(&WorkTimeConfig::default()).growth.is_empty());

        state.select_year(YearSelection::All);
        assert!(state.snapshot(&WorkTimeConfig::default()).growth.is_empty());
    }

    #[test]
    fn test_search_never_changes_totals() {
        let mut state = ViewState::new();
        state.load_data(two_years());
        let before = state.snapshot(&WorkTimeConfig::default());

        state.set_search_query("cinema");
        let after = state.snapshot(&WorkTimeConfig::default());

        assert_eq!(before.summary, after.summary);
        assert_eq!(before.insights, after.insights);
        assert_eq!(state.visible_rows().len(), 1);
        assert_eq!(state.filtered_rows().len(), 3);

        let listing = state.visible_transactions();
        assert_eq!(listing.query, "cinema");
        assert_eq!(listing.total_count, 1);
    }

    #[test]
    fn test_transactions_listing() {
        let mut state = ViewState::new();
        state.load_data(rows(json!([
            ["2023-01-10 09:30", "Depositos", "", "1000,00", "Salary"],
            ["2023-01-15", "Comida", "", "5,00"]
        ])));

        let listing = state.transactions("");
        assert_eq!(listing.total_count, 2);
        assert_eq!(listing.transactions[0].date, "2023-01-10");
        assert_eq!(listing.transactions[0].bucket, "income");
        assert_eq!(listing.transactions[1].description, "Entry 2");

        assert_eq!(state.transactions("salary").total_count, 1);
    }

    #[test]
    fn test_work_time_uses_monthly_income() {
        let mut state = ViewState::new();
        state.load_data(scenario());

        // 1000 / 12 per month over 100 hours, 50 of expense = 60h
        let config = WorkTimeConfig { period: WorkPeriod::Monthly, hours_per_period: Some(100.0) };
        let snapshot = state.snapshot(&config);
        let Some(WorkTime::Hours(hours)) = snapshot.insights[0].work_time else {
            panic!("expected hours");
        };
        assert!((hours - 60.0).abs() < 1e-9);

        // January alone earned 1000
        state.select_month(MonthSelection::Month(0));
        let snapshot = state.snapshot(&config);
        assert_eq!(snapshot.insights[0].work_time, Some(WorkTime::Hours(5.0)));

        let yearly = WorkTimeConfig { period: WorkPeriod::Yearly, hours_per_period: Some(2000.0) };
        let snapshot = state.snapshot(&yearly);
        assert_eq!(snapshot.insights[0].work_time, Some(WorkTime::Hours(100.0)));
    }

    #[test]
    fn test_work_time_omitted_without_income() {
        let mut state = ViewState::new();
        state.load_data(rows(json!([["2023-01-15", "Comida", "", "50,00", "Groceries"]])));
        let snapshot = state.snapshot(&WorkTimeConfig::default());
        assert!(snapshot.insights[0].work_time.is_none());
    }

    #[test]
    fn test_subscribers_run_in_order() {
        let mut state = ViewState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let seen = seen.clone();
            state.subscribe(move |_, change| {
                seen.lock().unwrap().push(format!("{}:{}", name, change));
                Ok(())
            });
        }

        state.toggle_history();
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:history_toggled", "second:history_toggled"]
        );
        assert!(state.show_history());
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let mut state = ViewState::new();
        let calls = Arc::new(AtomicUsize::new(0));

        state.subscribe(|_, _| Err(SubscriberError::new("render failed")));
        state.subscribe(|_, _| panic!("boom"));
        let counter = calls.clone();
        state.subscribe(move |view, change| {
            assert_eq!(change, StateChange::DataLoaded);
            assert!(view.has_data());
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        state.load_data(scenario());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("All".parse::<YearSelection>().unwrap(), YearSelection::All);
        assert_eq!("2023".parse::<YearSelection>().unwrap(), YearSelection::Year("2023".into()));
        assert!("20x3".parse::<YearSelection>().is_err());

        assert_eq!("all".parse::<MonthSelection>().unwrap(), MonthSelection::All);
        assert_eq!("11".parse::<MonthSelection>().unwrap(), MonthSelection::Month(11));
        assert!("12".parse::<MonthSelection>().is_err());
    }

    #[test]
    fn test_clear() {
        let mut state = ViewState::new();
        state.load_data(scenario());
        state.clear();
        assert!(!state.has_data());
        assert!(state.selected_year().is_none());
        assert!(state.current_year_rows().is_empty());
    }
}
