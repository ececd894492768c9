//! Dashboard routes - Year overview, refresh and reset

pub mod api;
pub mod page;

pub use api::{api_refresh, api_reset, api_select_year, api_snapshot, api_years};
pub use page::page_dashboard;
