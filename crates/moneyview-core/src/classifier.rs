//! Category classification: buckets, emoji and colors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Semantic bucket a row's amount contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryBucket {
    /// Money coming in (deposits)
    Income,
    /// Money set aside in investments
    Investment,
    /// Everything else
    Expense,
}

impl std::fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryBucket::Income => write!(f, "income"),
            CategoryBucket::Investment => write!(f, "investment"),
            CategoryBucket::Expense => write!(f, "expense"),
        }
    }
}

/// Category labels counted as income, lowercase
pub const INCOME_LABELS: &[&str] = &["depositos", "depósitos"];

/// Category labels counted as investment, lowercase
pub const INVESTMENT_LABELS: &[&str] = &["investimentos"];

/// Bucket for a category label (case-insensitive exact match)
pub fn classify(category: &str) -> CategoryBucket {
    let key = category.trim().to_lowercase();
    if INCOME_LABELS.contains(&key.as_str()) {
        CategoryBucket::Income
    } else if INVESTMENT_LABELS.contains(&key.as_str()) {
        CategoryBucket::Investment
    } else {
        CategoryBucket::Expense
    }
}

/// Glyph used when no pattern matches
pub const DEFAULT_EMOJI: &str = "💰";

/// Substring patterns and their glyphs. The first match wins, so a broad
/// pattern listed early shadows a more specific one listed later.
pub const EMOJI_PATTERNS: &[(&str, &str)] = &[
    ("casa", "🏠"),
    ("moradia", "🏠"),
    ("comida", "🍔"),
    ("alimentaçao", "🍔"),
    ("alimentação", "🍔"),
    ("restaurantes", "🍕"),
    ("supermercado", "🛒"),
    ("transporte", "🚗"),
    ("carro", "🚗"),
    ("combustivel", "⛽"),
    ("combustível", "⛽"),
    ("lazer", "🍿"),
    ("viagens", "✈️"),
    ("saude", "🏥"),
    ("saúde", "🏥"),
    ("farmacia", "💊"),
    ("farmácia", "💊"),
    ("educaçao", "📚"),
    ("educação", "📚"),
    ("compras", "🛍️"),
    ("shopping", "🛍️"),
    ("investimentos", "📈"),
    ("depositos", "💰"),
    ("depósitos", "💰"),
    ("salario", "💵"),
    ("salário", "💵"),
    ("telecomunicaçoes", "📱"),
    ("telecomunicações", "📱"),
    ("internet", "🌐"),
    ("telemovel", "📱"),
    ("telemóvel", "📱"),
    ("ginasio", "🏋️"),
    ("ginásio", "🏋️"),
    ("desporto", "⚽"),
    ("presentes", "🎁"),
    ("animais", "🐾"),
    ("pet", "🐾"),
    ("seguros", "🛡️"),
    ("impostos", "📑"),
    ("serviços", "🛠️"),
    ("uncategorized", "❓"),
];

/// Display glyph for a category
pub fn emoji_for(category: &str) -> &'static str {
    let key = category.trim().to_lowercase();
    EMOJI_PATTERNS
        .iter()
        .find(|(pattern, _)| key.contains(pattern))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(DEFAULT_EMOJI)
}

/// Fixed palette assigned round-robin to categories
pub const PALETTE: [&str; 12] = [
    "#6366f1", "#f43f5e", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4",
    "#ec4899", "#3b82f6", "#f97316", "#84cc16", "#0ea5e9", "#d946ef",
];

#[derive(Debug, Default)]
struct PaletteState {
    colors: HashMap<String, &'static str>,
    next: usize,
}

/// Session-scoped category → color assignment.
///
/// Colors are handed out in first-seen order and never change for the
/// lifetime of the palette. Assignment goes through a shared reference so
/// renderers holding a read view can still color new categories.
#[derive(Debug, Default)]
pub struct CategoryPalette {
    state: Mutex<PaletteState>,
}

impl CategoryPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for a category, assigning the next palette entry on first use
    pub fn color_for(&self, category: &str) -> &'static str {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(color) = state.colors.get(category) {
            return *color;
        }
        let color = PALETTE[state.next % PALETTE.len()];
        state.next += 1;
        state.colors.insert(category.to_string(), color);
        color
    }

    /// Number of categories seen so far
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_income_both_spellings() {
        assert_eq!(classify("Depositos"), CategoryBucket::Income);
        assert_eq!(classify("DEPÓSITOS"), CategoryBucket::Income);
        assert_eq!(classify(" depósitos "), CategoryBucket::Income);
    }

    #[test]
    fn test_classify_investment() {
        assert_eq!(classify("Investimentos"), CategoryBucket::Investment);
        assert_eq!(classify("investimentos"), CategoryBucket::Investment);
    }

    #[test]
    fn test_classify_is_exact_not_substring() {
        assert_eq!(classify("Depositos extra"), CategoryBucket::Expense);
        assert_eq!(classify("Comida"), CategoryBucket::Expense);
        assert_eq!(classify(""), CategoryBucket::Expense);
    }

    #[test]
    fn test_emoji_lookup() {
        assert_eq!(emoji_for("Comida"), "🍔");
        assert_eq!(emoji_for("  SUPERMERCADO "), "🛒");
        assert_eq!(emoji_for("Saúde"), "🏥");
        assert_eq!(emoji_for("Something else"), DEFAULT_EMOJI);
    }

    #[test]
    fn test_emoji_earlier_pattern_shadows_later() {
        // "casa" is declared before "restaurantes"
        assert_eq!(emoji_for("Restaurantes em casa"), "🏠");
        // "comida" is declared before "supermercado"
        assert_eq!(emoji_for("Supermercado comida"), "🍔");
        // "pet" matches inside unrelated words
        assert_eq!(emoji_for("Carpet cleaning"), "🐾");
    }

    #[test]
    fn test_color_is_stable() {
        let palette = CategoryPalette::new();
        let first = palette.color_for("Food");
        assert_eq!(palette.color_for("Food"), first);
        assert_eq!(first, PALETTE[0]);
        assert_eq!(palette.color_for("Rent"), PALETTE[1]);
        assert_eq!(palette.color_for("Food"), PALETTE[0]);
    }

    #[test]
    fn test_thirteenth_category_wraps() {
        let palette = CategoryPalette::new();
        for i in 0..12 {
            palette.color_for(&format!("cat-{}", i));
        }
        assert_eq!(palette.color_for("cat-12"), PALETTE[0]);
        assert_eq!(palette.len(), 13);
    }

    #[test]
    fn test_color_map_is_case_sensitive() {
        let palette = CategoryPalette::new();
        let upper = palette.color_for("Food");
        let lower = palette.color_for("food");
        assert_ne!(upper, lower);
    }
}
