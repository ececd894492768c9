//! Row ingestion from the positional wire format
//!
//! Source rows arrive as `[date, category, subcategory, amount, description]`
//! arrays. They are validated once here; everything downstream works on
//! [`Row`] and never looks at positions again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::parse_amount;
use crate::date::{display_date, parse_date, ParsedDate};
use crate::error::ParseError;

/// Minimum number of positions a row needs to take part in aggregation
pub const MIN_FIELDS: usize = 4;

/// One transaction from the source dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Date cell as received
    pub date: String,
    /// Category, trimmed
    pub category: String,
    pub subcategory: Option<String>,
    /// Amount cell as received
    pub amount_raw: String,
    pub description: Option<String>,
    /// Year and month derived from `date`
    pub parsed_date: ParsedDate,
    /// Magnitude derived from `amount_raw`
    pub amount: f64,
}

impl Row {
    /// Build a row from positional cells
    pub fn from_cells(cells: &[Value]) -> Result<Self, ParseError> {
        if cells.len() < MIN_FIELDS {
            return Err(ParseError::TooFewFields {
                found: cells.len(),
                expected: MIN_FIELDS,
            });
        }

        let date = cell_text(&cells[0]).trim().to_string();
        let parsed_date = parse_date(&date);
        if parsed_date.year.is_none() {
            return Err(ParseError::MissingYear { date });
        }

        let amount_raw = cell_text(&cells[3]);
        let amount = parse_amount(&amount_raw);

        Ok(Self {
            date,
            category: cell_text(&cells[1]).trim().to_string(),
            subcategory: optional_text(&cells[2]),
            amount_raw,
            description: cells.get(4).and_then(optional_text),
            parsed_date,
            amount,
        })
    }

    /// Build a row from a JSON value, which must be an array
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        match value {
            Value::Array(cells) => Self::from_cells(cells),
            _ => Err(ParseError::NotAnArray),
        }
    }

    /// Convenience constructor from string cells
    pub fn from_strs(cells: &[&str]) -> Result<Self, ParseError> {
        let values: Vec<Value> = cells.iter().map(|c| Value::String(c.to_string())).collect();
        Self::from_cells(&values)
    }

    /// Year this row belongs to
    pub fn year(&self) -> &str {
        self.parsed_date.year.as_deref().unwrap_or_default()
    }

    /// Zero-based month, `None` when unknown
    pub fn month(&self) -> Option<u32> {
        self.parsed_date.month
    }

    /// Date without any time suffix
    pub fn display_date(&self) -> &str {
        display_date(&self.date)
    }

    /// Case-insensitive substring match over every field
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            Some(self.date.as_str()),
            Some(self.category.as_str()),
            self.subcategory.as_deref(),
            Some(self.amount_raw.as_str()),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Result of ingesting a batch of raw rows
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    /// Valid rows in source order
    pub rows: Vec<Row>,
    /// Number of rows dropped
    pub rejected: usize,
}

/// Validate a batch of raw rows, dropping the ones that cannot be aggregated
pub fn ingest_rows(values: &[Value]) -> Ingested {
    let mut ingested = Ingested::default();

    for (index, value) in values.iter().enumerate() {
        match Row::from_value(value) {
            Ok(row) => ingested.rows.push(row),
            Err(e) => {
                log::debug!("Skipping row {}: {}", index, e);
                ingested.rejected += 1;
            }
        }
    }

    if ingested.rejected > 0 {
        log::debug!(
            "Ingested {} rows, rejected {}",
            ingested.rows.len(),
            ingested.rejected
        );
    }

    ingested
}

/// Text of a cell; numbers and booleans are stringified, null is empty
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn optional_text(value: &Value) -> Option<String> {
    let text = cell_text(value).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
