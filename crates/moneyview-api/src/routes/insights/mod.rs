//! Insights routes - Category cards, month selection and history

pub mod api;
pub mod page;

pub use api::{api_select_month, api_toggle_history};
pub use page::page_insights;
