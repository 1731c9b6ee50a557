//! Table and column identifiers: rendering into SQL and optional
//! standardisation of spreadsheet headers.

use crate::error::{Result, SheetSqlError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How identifiers are written into the script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum IdentifierStyle {
    /// Embedded verbatim: `students`.
    #[default]
    Bare,
    /// Backtick quoted: `` `students` ``.
    Backtick,
}

impl IdentifierStyle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bare => "Bare",
            Self::Backtick => "Backtick quoted",
        }
    }
}

/// Renders one identifier, rejecting names that would break the statement.
///
/// # Errors
///
/// Returns `InvalidIdentifier` for empty names, names with control
/// characters, and (bare style only) names containing a quote character.
pub fn render_identifier(name: &str, style: IdentifierStyle) -> Result<String> {
    if name.is_empty() {
        return Err(SheetSqlError::InvalidIdentifier(
            "identifier is empty".to_owned(),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(SheetSqlError::InvalidIdentifier(format!(
            "{name:?} contains control characters"
        )));
    }

    match style {
        IdentifierStyle::Bare => {
            if name.contains(['\'', '"', '`']) {
                return Err(SheetSqlError::InvalidIdentifier(format!(
                    "{name:?} contains a quote character; use backtick quoting or standardised names"
                )));
            }
            Ok(name.to_owned())
        }
        IdentifierStyle::Backtick => Ok(format!("`{}`", name.replace('`', "``"))),
    }
}

pub fn sanitize_column_name(name: &str) -> String {
    let clean: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();

    // Collapse runs of underscores
    let mut result = String::with_capacity(clean.len());
    let mut last_was_underscore = false;
    for c in clean.chars() {
        if c == '_' {
            if !last_was_underscore {
                result.push(c);
            }
            last_was_underscore = true;
        } else {
            result.push(c);
            last_was_underscore = false;
        }
    }

    let result = result.trim_matches('_');

    if result.is_empty() {
        "col".to_owned()
    } else if result.starts_with(|c: char| c.is_ascii_digit()) {
        format!("col_{result}")
    } else {
        result.to_owned()
    }
}

/// Sanitizes every name and suffixes duplicates with `_1`, `_2`, ...
pub fn sanitize_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();

    names
        .iter()
        .map(|name| {
            let base = sanitize_column_name(name.as_ref());
            let mut clean = base.clone();
            let mut count = 0;
            while seen.contains(&clean) {
                count += 1;
                clean = format!("{base}_{count}");
            }
            seen.insert(clean.clone());
            clean
        })
        .collect()
}
