//! Date parsing for `DD/MM/YYYY` and `YYYY-MM-DD` cells

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Year and month extracted from a date cell.
///
/// `month` is zero-based (0 = January); `None` means the month is unknown.
/// A date without a year cannot be placed in any yearly partition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedDate {
    pub year: Option<String>,
    pub month: Option<u32>,
}

static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(?:[ T]+\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)$")
        .expect("time suffix pattern is valid")
});

/// Parse a date cell.
///
/// Splits on `/` when present, otherwise on `-`. The year is the first
/// segment when it has four digits, otherwise the third; the month is
/// always the middle segment.
pub fn parse_date(raw: &str) -> ParsedDate {
    let date = date_part(raw.trim());

    let parts: Vec<&str> = if date.contains('/') {
        date.split('/').collect()
    } else {
        date.split('-').collect()
    };

    if parts.len() < 3 {
        return ParsedDate::default();
    }

    let year = if is_year(parts[0]) {
        Some(parts[0].to_string())
    } else if is_year(parts[2]) {
        Some(parts[2].to_string())
    } else {
        None
    };

    let month = parts[1]
        .trim()
        .parse::<i64>()
        .ok()
        .map(|m| m - 1)
        .filter(|m| (0..=11).contains(m))
        .map(|m| m as u32);

    ParsedDate { year, month }
}

/// Strip an `HH:MM[:SS]` suffix for display
pub fn display_date(raw: &str) -> &str {
    let trimmed = raw.trim();
    match TIME_SUFFIX.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(date) if !date.as_str().is_empty() => date.as_str(),
        _ => trimmed,
    }
}

/// Date portion of a cell: drops anything after whitespace or an ISO `T`
fn date_part(s: &str) -> &str {
    let s = s.split_whitespace().next().unwrap_or("");
    match s.find('T') {
        Some(idx) => &s[..idx],
        None => s,
    }
}

fn is_year(segment: &str) -> bool {
    segment.len() == 4 && segment.chars().all(|c| c.is_ascii_digit())
}
