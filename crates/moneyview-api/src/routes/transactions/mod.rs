//! Transaction routes - Listing and search

pub mod api;
pub mod page;

pub use api::{api_transactions, htmx_transactions_list};
pub use page::render_transaction_list;
