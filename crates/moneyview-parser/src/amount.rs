//! Currency string parsing

/// Currency symbols dropped before parsing
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£', '¥', '₹', '₩', '₽', '¤'];

/// Parse a currency-formatted string into a non-negative magnitude.
///
/// Currency symbols, whitespace and sign characters are dropped; the number
/// is the leading run of digits and separators, so any other text ends it.
/// When a decimal comma is present, dots are thousands separators
/// (`1.234,56`); several dots without a comma are also thousands
/// separators. Anything that cannot be read as a number yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '+' || *c == '-' || CURRENCY_SYMBOLS.contains(c)))
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = if let Some(comma) = cleaned.rfind(',') {
        // Grouping commas before the decimal one are dropped with the dots
        let (int_part, frac_part) = cleaned.split_at(comma);
        let int_digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
        format!("{}.{}", int_digits, &frac_part[1..])
    } else if cleaned.matches('.').count() > 1 {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    let value = leading_number(&normalized);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse the longest numeric prefix, `0.0` when there is none
fn leading_number(s: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
    }
    s[..end].parse::<f64>().unwrap_or(0.0)
}
