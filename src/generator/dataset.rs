use crate::error::{Result, SheetSqlError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inferred category of a column's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Timestamp,
    Boolean,
    /// The reader could not settle on a kind (e.g. an all-empty column).
    Unknown,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Timestamp => "Timestamp",
            Self::Boolean => "Boolean",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Missing values: explicit nulls and float NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Plain text form, without any SQL quoting.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Boolean(b) => b.to_string(),
            Self::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Integral floats keep a trailing `.0` so they still read as floats.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ValueKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// In-memory table: ordered columns and rows of matching arity.
///
/// The arity invariant is checked on construction and on every
/// [`Dataset::push_row`], so generation code can zip rows with columns
/// without re-checking.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// # Errors
    ///
    /// Returns `DataProcessing` if any row's length differs from the column count.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut dataset = Self {
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    /// # Errors
    ///
    /// Returns `DataProcessing` if the row's length differs from the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(SheetSqlError::DataProcessing(format!(
                "row {} has {} values but the dataset has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[Vec<Value>] {
        self.rows.get(..n).unwrap_or(self.rows.as_slice())
    }

    /// Replaces the column names, keeping kinds and rows.
    ///
    /// # Errors
    ///
    /// Returns `DataProcessing` if the number of names differs from the column count.
    pub fn rename_columns(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.columns.len() {
            return Err(SheetSqlError::DataProcessing(format!(
                "expected {} column names, got {}",
                self.columns.len(),
                names.len()
            )));
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;

    fn two_columns() -> Vec<Column> {
        vec![
            Column::new("id", ValueKind::Integer),
            Column::new("name", ValueKind::Text),
        ]
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Dataset::new(
            two_columns(),
            vec![
                vec![1_i64.into(), "a".into()],
                vec![2_i64.into()],
            ],
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("row 2 has 1 values"), "got {err}");
    }

    #[test]
    fn test_head_clamps_to_height() -> anyhow::Result<()> {
        let ds = Dataset::new(two_columns(), vec![vec![1_i64.into(), "a".into()]])?;
        assert_eq!(ds.head(10).len(), 1);
        assert_eq!(ds.head(0).len(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_values() {
        assert!(Value::Null.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert!(!Value::Text(String::new()).is_missing());
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Value::Float(91.5).to_display_string(), "91.5");
        assert_eq!(Value::Float(3.0).to_display_string(), "3.0");
        assert_eq!(Value::Integer(-7).to_display_string(), "-7");

        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(Value::Timestamp(ts).to_display_string(), "2024-03-01 08:30:00");
    }

    #[test]
    fn test_rename_columns_checks_count() -> anyhow::Result<()> {
        let mut ds = Dataset::new(two_columns(), vec![])?;
        assert!(ds.rename_columns(vec!["only_one".to_owned()]).is_err());
        ds.rename_columns(vec!["a".to_owned(), "b".to_owned()])?;
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        Ok(())
    }
}
