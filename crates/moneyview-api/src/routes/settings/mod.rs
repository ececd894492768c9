//! Settings routes - Configuration display and reset

pub mod api;
pub mod page;

pub use api::api_settings;
pub use page::page_settings;
