//! Aggregation engine
//!
//! Pure functions over row slices: yearly partitioning, bucket totals,
//! expense breakdowns, monthly trends, growth and work-time conversion.
//! Nothing here is cached; callers recompute on every state change.

use moneyview_parser::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classifier::{classify, emoji_for, CategoryBucket, CategoryPalette};

// ==================== Partitioning ====================

/// Rows grouped by year, source order preserved inside each year
#[derive(Debug, Clone, Default)]
pub struct YearlyPartition {
    years: HashMap<String, Vec<Row>>,
}

impl YearlyPartition {
    /// Rows of a year
    pub fn get(&self, year: &str) -> Option<&[Row]> {
        self.years.get(year).map(Vec::as_slice)
    }

    pub fn contains(&self, year: &str) -> bool {
        self.years.contains_key(year)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Year keys, most recent first
    pub fn years(&self) -> Vec<String> {
        let mut years: Vec<String> = self.years.keys().cloned().collect();
        years.sort_by(|a, b| {
            let (na, nb) = (a.parse::<i64>().unwrap_or(i64::MIN), b.parse::<i64>().unwrap_or(i64::MIN));
            nb.cmp(&na).then_with(|| b.cmp(a))
        });
        years
    }

    /// Most recent year, if any
    pub fn latest_year(&self) -> Option<String> {
        self.years().into_iter().next()
    }

    /// Total number of partitioned rows
    pub fn row_count(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }
}

/// Group rows by their parsed year. Rows without a year are left out.
pub fn partition_by_year<'a, I>(rows: I) -> YearlyPartition
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut partition = YearlyPartition::default();
    for row in rows {
        if let Some(year) = &row.parsed_date.year {
            partition.years.entry(year.clone()).or_default().push(row.clone());
        }
    }
    partition
}

// ==================== Totals ====================

/// Summed expense of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Bucket totals for a set of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub investment: f64,
    /// Expense per category, first-seen order
    pub per_category_expense: Vec<CategoryTotal>,
}

impl Summary {
    /// Income minus expense
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Net over income as a fraction, 0 when there is no income
    pub fn savings_rate(&self) -> f64 {
        if self.income > 0.0 {
            self.net() / self.income
        } else {
            0.0
        }
    }

    /// Sum of every bucket
    pub fn total(&self) -> f64 {
        self.income + self.expense + self.investment
    }

    /// Expense of a single category
    pub fn category_expense(&self, category: &str) -> Option<f64> {
        self.per_category_expense
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
    }
}

/// Total each bucket and the per-category expense
pub fn summarize<'a, I>(rows: I) -> Summary
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut summary = Summary::default();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match classify(&row.category) {
            CategoryBucket::Income => summary.income += row.amount,
            CategoryBucket::Investment => summary.investment += row.amount,
            CategoryBucket::Expense => {
                summary.expense += row.amount;
                match index.get(row.category.as_str()) {
                    Some(&i) => summary.per_category_expense[i].amount += row.amount,
                    None => {
                        index.insert(row.category.as_str(), summary.per_category_expense.len());
                        summary.per_category_expense.push(CategoryTotal {
                            category: row.category.clone(),
                            amount: row.amount,
                        });
                    }
                }
            }
        }
    }

    summary
}

/// Category with its share of total expense, ready for bar rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Percentage of total expense
    pub percentage: f64,
    pub color: String,
    pub emoji: String,
}

/// Expense categories ranked by amount, largest first
pub fn rank_categories(summary: &Summary, palette: &CategoryPalette) -> Vec<CategoryShare> {
    let mut ranked: Vec<&CategoryTotal> = summary.per_category_expense.iter().collect();
    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    ranked
        .into_iter()
        .map(|c| CategoryShare {
            category: c.category.clone(),
            amount: c.amount,
            percentage: if summary.expense > 0.0 {
                c.amount / summary.expense * 100.0
            } else {
                0.0
            },
            color: palette.color_for(&c.category).to_string(),
            emoji: emoji_for(&c.category).to_string(),
        })
        .collect()
}

// ==================== Growth ====================

/// Percentage change from `previous` to `current`.
///
/// `None` when there is nothing to compare against (previous is zero).
pub fn growth(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Metric a growth badge is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Income,
    Expense,
    Investment,
}

impl Metric {
    /// Whether a decrease is the good direction
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Expense)
    }
}

/// Direction of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Year-over-year comparison of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthBadge {
    pub metric: Metric,
    /// Signed percentage change
    pub percent: f64,
    pub direction: Direction,
    /// True when the change is good news (inverted for expenses)
    pub favorable: bool,
    /// Year the comparison is made against
    pub compared_to: String,
}

impl GrowthBadge {
    /// Badge for a metric, `None` when the previous value is zero
    pub fn compute(metric: Metric, current: f64, previous: f64, compared_to: &str) -> Option<Self> {
        let percent = growth(current, previous)?;
        let favorable = if metric.lower_is_better() {
            percent <= 0.0
        } else {
            percent >= 0.0
        };
        Some(Self {
            metric,
            percent,
            direction: if percent >= 0.0 { Direction::Up } else { Direction::Down },
            favorable,
            compared_to: compared_to.to_string(),
        })
    }

    /// Arrow glyph for the direction
    pub fn arrow(&self) -> &'static str {
        match self.direction {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

// ==================== Breakdown ====================

/// Summed expense of one subcategory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryTotal {
    pub name: String,
    pub amount: f64,
}

/// Largest single expense of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiggestExpense {
    pub description: String,
    pub amount: f64,
    pub date: String,
}

/// Expenses of one category split by subcategory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    /// Subcategories in first-seen order
    pub subcategories: Vec<SubcategoryTotal>,
    pub biggest: BiggestExpense,
}

impl CategoryGroup {
    /// Sum over all subcategories
    pub fn total(&self) -> f64 {
        self.subcategories.iter().map(|s| s.amount).sum()
    }

    /// Subcategories, largest first
    pub fn ranked_subcategories(&self) -> Vec<&SubcategoryTotal> {
        let mut subs: Vec<&SubcategoryTotal> = self.subcategories.iter().collect();
        subs.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        subs
    }

    /// Amount of a single subcategory
    pub fn subcategory(&self, name: &str) -> Option<f64> {
        self.subcategories.iter().find(|s| s.name == name).map(|s| s.amount)
    }
}

/// Expense breakdown, categories in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub groups: Vec<CategoryGroup>,
}

impl Breakdown {
    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }
}

const FALLBACK_CATEGORY: &str = "Other";
const FALLBACK_SUBCATEGORY: &str = "Default";
const FALLBACK_DESCRIPTION: &str = "Expense";

/// Two-level expense breakdown plus the biggest row of each category
pub fn breakdown<'a, I>(rows: I) -> Breakdown
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut result = Breakdown::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if classify(&row.category) != CategoryBucket::Expense {
            continue;
        }

        let category = non_empty(&row.category, FALLBACK_CATEGORY);
        let subcategory = non_empty(row.subcategory.as_deref().unwrap_or(""), FALLBACK_SUBCATEGORY);
        let description = non_empty(row.description.as_deref().unwrap_or(""), FALLBACK_DESCRIPTION);

        let group_index = *index.entry(category.to_string()).or_insert_with(|| {
            result.groups.push(CategoryGroup {
                category: category.to_string(),
                subcategories: Vec::new(),
                biggest: BiggestExpense {
                    description: description.to_string(),
                    amount: row.amount,
                    date: row.display_date().to_string(),
                },
            });
            result.groups.len() - 1
        });
        let group = &mut result.groups[group_index];

        match group.subcategories.iter_mut().find(|s| s.name == subcategory) {
            Some(sub) => sub.amount += row.amount,
            None => group.subcategories.push(SubcategoryTotal {
                name: subcategory.to_string(),
                amount: row.amount,
            }),
        }

        if row.amount > group.biggest.amount {
            group.biggest = BiggestExpense {
                description: description.to_string(),
                amount: row.amount,
                date: row.display_date().to_string(),
            };
        }
    }

    result
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

// ==================== Monthly trend ====================

/// Per-month bucket totals for one year, index 0 = January
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub income: [f64; 12],
    pub expense: [f64; 12],
    pub investment: [f64; 12],
}

impl MonthlyTrend {
    /// Whether any income was recorded in a month
    pub fn has_income(&self, month: u32) -> bool {
        self.income.get(month as usize).is_some_and(|v| *v > 0.0)
    }

    /// Whether a month has any activity at all
    pub fn has_activity(&self, month: u32) -> bool {
        let m = month as usize;
        m < 12 && (self.income[m] > 0.0 || self.expense[m] > 0.0 || self.investment[m] > 0.0)
    }
}

/// Bucket totals per calendar month.
///
/// Only rows of `year` count (`None` = every year). Rows with an unknown
/// month are excluded from every slot.
pub fn monthly_trend<'a, I>(rows: I, year: Option<&str>) -> MonthlyTrend
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut trend = MonthlyTrend::default();

    for row in rows {
        if let Some(year) = year {
            if row.parsed_date.year.as_deref() != Some(year) {
                continue;
            }
        }
        let Some(month) = row.month() else {
            continue;
        };
        let slot = month as usize;
        if slot >= 12 {
            continue;
        }
        match classify(&row.category) {
            CategoryBucket::Income => trend.income[slot] += row.amount,
            CategoryBucket::Investment => trend.investment[slot] += row.amount,
            CategoryBucket::Expense => trend.expense[slot] += row.amount,
        }
    }

    trend
}

// ==================== Work time ====================

/// Labor time equivalent to an amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum WorkTime {
    /// One hour or more
    Hours(f64),
    /// Less than one hour, rounded
    Minutes(u64),
}

impl std::fmt::Display for WorkTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkTime::Hours(h) => write!(f, "{:.1}h", h),
            WorkTime::Minutes(m) => write!(f, "{}min", m),
        }
    }
}

/// Re-express `amount` as hours of work at `income / hours_per_period`.
///
/// `None` when income or hours are not positive.
pub fn work_time_equivalent(amount: f64, income: f64, hours_per_period: f64) -> Option<WorkTime> {
    if !(income > 0.0 && hours_per_period > 0.0 && amount.is_finite()) {
        return None;
    }
    let hourly_rate = income / hours_per_period;
    let hours = amount / hourly_rate;
    if hours >= 1.0 {
        Some(WorkTime::Hours(hours))
    } else {
        Some(WorkTime::Minutes((hours * 60.0).round().max(0.0) as u64))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, category: &str, sub: &str, amount: &str, desc: &str) -> Row {
        Row::from_strs(&[date, category, sub, amount, desc]).unwrap()
    }

    fn sample() -> Vec<Row> {
        vec![
            row("2023-01-10", "Depositos", "", "1000,00", "Salary"),
            row("2023-01-15", "Comida", "Supermercado", "50,00", "Groceries"),
            row("2023-02-01", "Investimentos", "", "200,00", "ETF"),
            row("2022-12-20", "Comida", "Restaurantes", "30,00", "Dinner"),
            row("05/03/2023", "Casa", "Renda", "500,00", "Rent"),
            row("2023-03-07", "Comida", "Supermercado", "25,00", "Market"),
        ]
    }

    #[test]
    fn test_partition_by_year() {
        let rows = sample();
        let partition = partition_by_year(&rows);

        assert_eq!(partition.years(), vec!["2023".to_string(), "2022".to_string()]);
        assert_eq!(partition.get("2023").unwrap().len(), 5);
        assert_eq!(partition.get("2022").unwrap().len(), 1);
        assert_eq!(partition.row_count(), rows.len());
        assert_eq!(partition.latest_year().as_deref(), Some("2023"));
    }

    #[test]
    fn test_partition_preserves_source_order() {
        let rows = sample();
        let partition = partition_by_year(&rows);
        let descriptions: Vec<_> = partition
            .get("2023")
            .unwrap()
            .iter()
            .map(|r| r.description.clone().unwrap())
            .collect();
        assert_eq!(descriptions, vec!["Salary", "Groceries", "ETF", "Rent", "Market"]);
    }

    #[test]
    fn test_partition_years_sort_numerically() {
        let rows = vec![
            row("2019-01-01", "Comida", "", "1", ""),
            row("2021-01-01", "Comida", "", "1", ""),
            row("2020-01-01", "Comida", "", "1", ""),
        ];
        assert_eq!(partition_by_year(&rows).years(), vec!["2021", "2020", "2019"]);
    }

    #[test]
    fn test_summarize() {
        let rows = sample();
        let partition = partition_by_year(&rows);
        let summary = summarize(partition.get("2023").unwrap());

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.investment, 200.0);
        assert_eq!(summary.expense, 575.0);
        assert_eq!(summary.net(), 425.0);
        assert_eq!(summary.category_expense("Comida"), Some(75.0));
        assert_eq!(summary.category_expense("Casa"), Some(500.0));
        assert_eq!(summary.category_expense("Depositos"), None);
        assert_eq!(summary.per_category_expense[0].category, "Comida");
    }

    #[test]
    fn test_bucket_exclusivity() {
        let rows = sample();
        let summary = summarize(&rows);
        let total: f64 = rows.iter().map(|r| r.amount).sum();
        assert!((summary.total() - total).abs() < 1e-9);
    }

    #[test]
    fn test_savings_rate_without_income() {
        let summary = summarize(&[row("2023-01-01", "Comida", "", "10", "")]);
        assert_eq!(summary.savings_rate(), 0.0);
        assert_eq!(summary.net(), -10.0);
    }

    #[test]
    fn test_growth() {
        assert_eq!(growth(120.0, 100.0), Some(20.0));
        assert_eq!(growth(80.0, 100.0), Some(-20.0));
        assert_eq!(growth(50.0, 0.0), None);
    }

    #[test]
    fn test_growth_badge_polarity() {
        let income = GrowthBadge::compute(Metric::Income, 120.0, 100.0, "2022").unwrap();
        assert_eq!(income.direction, Direction::Up);
        assert!(income.favorable);

        let expense_up = GrowthBadge::compute(Metric::Expense, 120.0, 100.0, "2022").unwrap();
        assert_eq!(expense_up.direction, Direction::Up);
        assert!(!expense_up.favorable);

        let expense_down = GrowthBadge::compute(Metric::Expense, 80.0, 100.0, "2022").unwrap();
        assert_eq!(expense_down.direction, Direction::Down);
        assert_eq!(expense_down.arrow(), "↓");
        assert!(expense_down.favorable);

        let investment_down = GrowthBadge::compute(Metric::Investment, 80.0, 100.0, "2022").unwrap();
        assert!(!investment_down.favorable);

        assert!(GrowthBadge::compute(Metric::Income, 10.0, 0.0, "2022").is_none());
    }

    #[test]
    fn test_breakdown() {
        let rows = sample();
        let result = breakdown(&rows);

        let categories: Vec<_> = result.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Comida", "Casa"]);

        let comida = result.group("Comida").unwrap();
        assert_eq!(comida.subcategory("Supermercado"), Some(75.0));
        assert_eq!(comida.subcategory("Restaurantes"), Some(30.0));
        assert_eq!(comida.total(), 105.0);
        assert_eq!(comida.biggest.description, "Groceries");
        assert_eq!(comida.biggest.amount, 50.0);
        assert_eq!(comida.ranked_subcategories()[0].name, "Supermercado");
    }

    #[test]
    fn test_breakdown_ties_keep_first_and_fallbacks() {
        let rows = vec![
            row("2023-01-01", "", "", "10", ""),
            row("2023-01-02", "Lazer", "Cinema", "15", "First"),
            row("2023-01-03", "Lazer", "Cinema", "15", "Second"),
        ];
        let result = breakdown(&rows);

        let other = result.group("Other").unwrap();
        assert_eq!(other.subcategory("Default"), Some(10.0));
        assert_eq!(other.biggest.description, "Expense");

        let lazer = result.group("Lazer").unwrap();
        assert_eq!(lazer.biggest.description, "First");
    }

    #[test]
    fn test_breakdown_skips_income_and_investment() {
        let rows = vec![
            row("2023-01-10", "Depósitos", "", "1000", "Salary"),
            row("2023-01-11", "Investimentos", "", "100", "ETF"),
        ];
        assert!(breakdown(&rows).groups.is_empty());
    }

    #[test]
    fn test_monthly_trend() {
        let mut rows = sample();
        rows.push(row("2023-13-01", "Comida", "", "999", "Unknown month"));
        let trend = monthly_trend(&rows, Some("2023"));

        assert_eq!(trend.income[0], 1000.0);
        assert_eq!(trend.expense[0], 50.0);
        assert_eq!(trend.investment[1], 200.0);
        assert_eq!(trend.expense[2], 525.0);
        assert_eq!(trend.expense[11], 0.0);
        assert!(trend.has_income(0));
        assert!(!trend.has_income(1));
        assert!(trend.has_activity(1));
        let expense_total: f64 = trend.expense.iter().sum();
        assert_eq!(expense_total, 575.0);
    }

    #[test]
    fn test_monthly_trend_all_years() {
        let rows = sample();
        let trend = monthly_trend(&rows, None);
        assert_eq!(trend.expense[11], 30.0);
    }

    #[test]
    fn test_rank_categories() {
        let rows = sample();
        let summary = summarize(&rows);
        let palette = CategoryPalette::new();
        let ranked = rank_categories(&summary, &palette);

        assert_eq!(ranked[0].category, "Casa");
        assert_eq!(ranked[1].category, "Comida");
        let total: f64 = ranked.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(ranked[1].emoji, "🍔");
    }

    #[test]
    fn test_work_time_equivalent() {
        // 1900 / 190 = 10 per hour
        assert_eq!(work_time_equivalent(25.0, 1900.0, 190.0), Some(WorkTime::Hours(2.5)));
        assert_eq!(work_time_equivalent(5.0, 1900.0, 190.0), Some(WorkTime::Minutes(30)));
        assert_eq!(work_time_equivalent(5.0, 0.0, 190.0), None);
        assert_eq!(work_time_equivalent(5.0, -10.0, 190.0), None);
    }

    #[test]
    fn test_work_time_display() {
        assert_eq!(WorkTime::Hours(2.54).to_string(), "2.5h");
        assert_eq!(WorkTime::Minutes(30).to_string(), "30min");
    }
}
