//! Error types for moneyview-parser

use thiserror::Error;

/// Reasons a source row is rejected at ingestion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Row is not an array")]
    NotAnArray,

    #[error("Row has {found} fields, at least {expected} required")]
    TooFewFields { found: usize, expected: usize },

    #[error("No year in date: '{date}'")]
    MissingYear { date: String },
}
