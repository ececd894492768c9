//! Spreadsheet export parser
//!
//! Normalizes free-form currency strings and the two date layouts found in
//! exported sheets (`DD/MM/YYYY` and `YYYY-MM-DD`) and turns positional
//! rows into typed [`Row`] records. Malformed values never raise: amounts
//! degrade to zero and rows without a year are dropped at ingestion.

pub mod amount;
pub mod date;
pub mod error;
pub mod row;

pub use amount::parse_amount;
pub use date::{display_date, parse_date, ParsedDate};
pub use error::ParseError;
pub use row::{ingest_rows, Ingested, Row, MIN_FIELDS};
