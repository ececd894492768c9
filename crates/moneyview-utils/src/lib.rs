//! Utility functions and helpers

/// Short month names, indexed by zero-based month
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short label for a zero-based month
pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS.get(month as usize).copied().unwrap_or("?")
}

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Format a currency value, e.g. `€1.234,56`
pub fn format_currency(
    value: f64,
    symbol: &str,
    thousands_separator: &str,
    decimal_separator: &str,
    decimal_places: u32,
) -> String {
    let fixed = format!("{:.*}", decimal_places as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    let mut out = format!("{}{}{}", sign, symbol, format_number(int_part, thousands_separator));
    if let Some(frac) = frac_part {
        out.push_str(decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Format a percentage with one decimal
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Escape text for inclusion in HTML
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
