//! Route modules for the API server
//!
//! - dashboard: Year overview, refresh and reset
//! - insights: Per-category insight cards and month selection
//! - transactions: Transaction list and search
//! - setup: Source URL form
//! - settings: Settings page
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod dashboard;
pub mod insights;
pub mod settings;
pub mod setup;
pub mod transactions;
