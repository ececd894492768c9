//! Setup routes - Data source URL

pub mod page;

pub use page::{page_setup, setup_submit};
