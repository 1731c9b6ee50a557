//! Reading uploaded files into a [`Dataset`].
//!
//! CSV goes through Polars, which also infers column dtypes. Workbooks go
//! through calamine; there the column kind is inferred here from the cells.

use super::dataset::{Column, Dataset, Value, ValueKind};
use crate::error::{Result, ResultExt as _, SheetSqlError};
use calamine::{Data, Reader as _, open_workbook_auto};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

/// Extensions accepted by [`load_dataset`], for file pickers.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&file_extension(path).as_str())
}

/// Loads a `.csv`, `.xlsx` or `.xls` file.
///
/// # Errors
///
/// `UnsupportedFormat` for any other extension, otherwise whatever the
/// reader reports.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let ext = file_extension(path);
    tracing::debug!("Loading {} as {ext}", path.display());

    match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xls" | "xlsm" | "ods" => load_workbook(path),
        "" => Err(SheetSqlError::UnsupportedFormat("(none)".to_owned())),
        _ => Err(SheetSqlError::UnsupportedFormat(ext)),
    }
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10_000))
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()
        .context("Failed to scan CSV")?
        .collect()
        .context("Failed to read CSV")?;

    dataset_from_frame(&df)
}

pub fn kind_for_dtype(dtype: &DataType) -> ValueKind {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ValueKind::Integer,
        DataType::Float32 | DataType::Float64 => ValueKind::Float,
        DataType::Boolean => ValueKind::Boolean,
        DataType::Date | DataType::Datetime(_, _) => ValueKind::Timestamp,
        DataType::String => ValueKind::Text,
        _ => ValueKind::Unknown,
    }
}

/// Converts a Polars frame, keeping column order.
///
/// # Errors
///
/// Returns `DataProcessing` if a column cannot be cast to its kind's
/// physical type.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let mut columns = Vec::with_capacity(df.width());
    let mut values_by_column = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let kind = kind_for_dtype(column.dtype());
        values_by_column.push(series_values(column.as_materialized_series(), kind)?);
        columns.push(Column::new(column.name().as_str(), kind));
    }

    let rows = transpose(values_by_column, df.height());
    Dataset::new(columns, rows)
}

fn series_values(series: &Series, kind: ValueKind) -> Result<Vec<Value>> {
    let values = match kind {
        ValueKind::Integer => series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(Value::from)
            .collect(),
        ValueKind::Float => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(Value::from)
            .collect(),
        ValueKind::Boolean => series.bool()?.into_iter().map(Value::from).collect(),
        ValueKind::Timestamp => series
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|micros| {
                Value::from(
                    micros
                        .and_then(DateTime::<Utc>::from_timestamp_micros)
                        .map(|dt| dt.naive_utc()),
                )
            })
            .collect(),
        ValueKind::Text | ValueKind::Unknown => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(Value::from)
            .collect(),
    };
    Ok(values)
}

fn transpose(values_by_column: Vec<Vec<Value>>, height: usize) -> Vec<Vec<Value>> {
    let mut columns: Vec<_> = values_by_column.into_iter().map(Vec::into_iter).collect();
    (0..height)
        .map(|_| {
            columns
                .iter_mut()
                .map(|col| col.next().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}

fn load_workbook(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetSqlError::DataProcessing("the workbook has no worksheets".to_owned()))??;

    tracing::debug!(
        "Worksheet range {}x{} in {}",
        range.height(),
        range.width(),
        path.display()
    );
    dataset_from_rows(range.rows())
}

/// Builds a dataset from worksheet rows; the first row holds the headers.
///
/// # Errors
///
/// Returns `DataProcessing` if there is no header row.
pub fn dataset_from_rows<'a, I>(rows: I) -> Result<Dataset>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| SheetSqlError::DataProcessing("the worksheet is empty".to_owned()))?;
    let names = dedupe_headers(
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(cell, idx)),
    );

    let mut cells_by_column: Vec<Vec<&Data>> = vec![Vec::new(); names.len()];
    let mut height = 0;
    for row in rows {
        for (idx, cells) in cells_by_column.iter_mut().enumerate() {
            cells.push(row.get(idx).unwrap_or(&Data::Empty));
        }
        height += 1;
    }

    let mut columns = Vec::with_capacity(names.len());
    let mut values_by_column: Vec<Vec<Value>> = Vec::with_capacity(names.len());
    for (name, cells) in names.into_iter().zip(&cells_by_column) {
        let kind = infer_cell_kind(cells);
        values_by_column.push(cells.iter().map(|cell| cell_value(cell, kind)).collect());
        columns.push(Column::new(name, kind));
    }

    Dataset::new(columns, transpose(values_by_column, height))
}

fn header_name(cell: &Data, idx: usize) -> String {
    match cell {
        Data::Empty => format!("Unnamed: {idx}"),
        Data::String(s) if s.trim().is_empty() => format!("Unnamed: {idx}"),
        Data::String(s) => s.clone(),
        other => cell_text(other).unwrap_or_else(|| format!("Unnamed: {idx}")),
    }
}

/// Repeated headers get `_1`, `_2` ... suffixes, first occurrence unchanged.
fn dedupe_headers(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let names: Vec<String> = names.into_iter().collect();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen = HashSet::new();

    names
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let unique = (1..)
                .map(|n| format!("{name}_{n}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| name.clone());
            taken.insert(unique.clone());
            seen.insert(unique.clone());
            unique
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_)) || matches!(cell, Data::String(s) if s.is_empty())
}

/// 2^63; integral floats outside `-2^63..2^63` do not fit an `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn is_integral(cell: &Data) -> bool {
    match cell {
        Data::Int(_) => true,
        Data::Float(f) => f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f),
        _ => false,
    }
}

/// Kind of a worksheet column, judged on its non-blank cells.
pub fn infer_cell_kind(cells: &[&Data]) -> ValueKind {
    let filled: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();

    if filled.is_empty() {
        ValueKind::Unknown
    } else if filled.iter().all(|c| matches!(c, Data::Bool(_))) {
        ValueKind::Boolean
    } else if filled.iter().all(|c| matches!(c, Data::DateTime(_) | Data::DateTimeIso(_))) {
        ValueKind::Timestamp
    } else if filled.iter().all(|c| is_integral(c)) {
        ValueKind::Integer
    } else if filled.iter().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        ValueKind::Float
    } else {
        ValueKind::Text
    }
}

fn cell_value(cell: &Data, kind: ValueKind) -> Value {
    if is_blank(cell) {
        return Value::Null;
    }
    match (kind, cell) {
        (ValueKind::Integer, Data::Int(i)) => Value::Integer(*i),
        (ValueKind::Integer, Data::Float(f)) => Value::Integer(*f as i64),
        (ValueKind::Float, Data::Int(i)) => Value::Float(*i as f64),
        (ValueKind::Float, Data::Float(f)) => Value::Float(*f),
        (ValueKind::Boolean, Data::Bool(b)) => Value::Boolean(*b),
        (ValueKind::Timestamp, Data::DateTime(dt)) => {
            dt.as_datetime().map_or_else(|| text_fallback(cell), Value::Timestamp)
        }
        (ValueKind::Timestamp, Data::DateTimeIso(s)) => {
            parse_iso_datetime(s).map_or_else(|| text_fallback(cell), Value::Timestamp)
        }
        (ValueKind::Text, other) => cell_text(other).into(),
        _ => text_fallback(cell),
    }
}

/// Keeps a filled cell that does not convert to its column's kind.
fn text_fallback(cell: &Data) -> Value {
    tracing::warn!("Keeping cell {cell:?} as text");
    cell_text(cell).into()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(Value::Float(*f).to_display_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(ts) => Value::Timestamp(ts).to_display_string(),
            None => dt.as_f64().to_string(),
        }),
        Data::Error(e) => Some(e.to_string()),
    }
}

/// ISO 8601 date or date-time; zoned values are converted to UTC.
fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
