//! Rendering of scalar values into SQL literals.

use super::dataset::{Value, ValueKind};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Placeholder written for missing values under [`ValuePolicy::QuoteAll`].
pub const MISSING_PLACEHOLDER: &str = "nan";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum ValuePolicy {
    /// Every value single-quoted; missing values become `'nan'`.
    QuoteAll,
    /// Missing values become `NULL`; everything else single-quoted.
    NullAware,
    /// `NULL` for missing values, bare numbers and booleans, quoted text
    /// and timestamps.
    #[default]
    Typed,
}

impl ValuePolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::QuoteAll => "Quote everything",
            Self::NullAware => "Quote everything, NULL for missing",
            Self::Typed => "Typed literals",
        }
    }

    pub const ALL: [Self; 3] = [Self::Typed, Self::NullAware, Self::QuoteAll];
}

/// Single-quoted SQL string literal with embedded quotes doubled.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Renders one cell of a column of the given kind.
pub fn render_value(value: &Value, kind: ValueKind, policy: ValuePolicy) -> String {
    if value.is_missing() {
        return match policy {
            ValuePolicy::QuoteAll => quote_literal(MISSING_PLACEHOLDER),
            ValuePolicy::NullAware | ValuePolicy::Typed => "NULL".to_owned(),
        };
    }

    match policy {
        ValuePolicy::QuoteAll | ValuePolicy::NullAware => {
            quote_literal(&value.to_display_string())
        }
        ValuePolicy::Typed => render_typed(value, kind),
    }
}

fn render_typed(value: &Value, kind: ValueKind) -> String {
    match (kind, value) {
        (ValueKind::Integer | ValueKind::Float, Value::Integer(i)) => i.to_string(),
        (ValueKind::Integer | ValueKind::Float, Value::Float(f)) if f.is_finite() => {
            value.to_display_string()
        }
        (ValueKind::Boolean, Value::Boolean(true)) => "TRUE".to_owned(),
        (ValueKind::Boolean, Value::Boolean(false)) => "FALSE".to_owned(),
        _ => quote_literal(&value.to_display_string()),
    }
}

/// Renders a whole row as a parenthesized tuple.
pub fn render_row(row: &[Value], kinds: &[ValueKind], policy: ValuePolicy) -> String {
    let values: Vec<String> = row
        .iter()
        .zip(kinds)
        .map(|(value, kind)| render_value(value, *kind, policy))
        .collect();
    format!("({})", values.join(", "))
}
