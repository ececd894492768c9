//! Core aggregation engine and view state
//!
//! Rows flow from a [`source::DataSource`] (or the cache in a
//! [`store::KeyValueStore`]) through the parser into [`view_state::ViewState`],
//! which derives every figure the dashboard shows on demand:
//!
//! - classifier: income / investment / expense buckets, emoji, colors
//! - aggregation: totals, breakdowns, monthly trend, growth, work time
//! - view_state: selection, transitions and change notifications
//! - dashboard: refresh, cache and setup around the view state

pub mod aggregation;
pub mod classifier;
pub mod dashboard;
pub mod error;
pub mod reports;
pub mod source;
pub mod store;
pub mod view_state;

pub use aggregation::{
    breakdown, growth, monthly_trend, partition_by_year, rank_categories, summarize,
    work_time_equivalent, Breakdown, CategoryGroup, CategoryShare, GrowthBadge, Metric,
    MonthlyTrend, Summary, WorkTime, YearlyPartition,
};
pub use classifier::{classify, emoji_for, CategoryBucket, CategoryPalette};
pub use dashboard::{Dashboard, RefreshOutcome};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use reports::{InsightCard, Snapshot, TransactionItem, TransactionsResponse};
pub use source::{decode_payload, DataSource, HttpSource};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use view_state::{MonthSelection, StateChange, SubscriberError, ViewState, YearSelection};
