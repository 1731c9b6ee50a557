use super::dataset::{Dataset, ValueKind};
use super::naming::{IdentifierStyle, render_identifier};
use super::type_map::sql_type_for;
use super::values::{ValuePolicy, render_row};
use crate::error::{Result, SheetSqlError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table name used when the caller leaves it blank.
pub const DEFAULT_TABLE_NAME: &str = "table_name";

/// Content type of the downloadable script.
pub const SQL_CONTENT_TYPE: &str = "text/sql";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptOptions {
    pub value_policy: ValuePolicy,
    pub identifier_style: IdentifierStyle,
    /// Maximum tuples per `INSERT`; `None` puts every row in one statement.
    pub rows_per_insert: Option<usize>,
}

/// Generated `CREATE TABLE` and `INSERT INTO` statements for one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlScript {
    table_name: String,
    create_table: String,
    inserts: Vec<String>,
}

impl SqlScript {
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn create_table(&self) -> &str {
        &self.create_table
    }

    /// Empty when the dataset had no rows.
    pub fn inserts(&self) -> &[String] {
        &self.inserts
    }

    /// Full script text, statements separated by a blank line.
    pub fn text(&self) -> String {
        let mut text = self.create_table.clone();
        for insert in &self.inserts {
            text.push_str("\n\n");
            text.push_str(insert);
        }
        text
    }

    /// Name offered for the download, `<table_name>.sql`.
    ///
    /// Path separators and other characters file systems reject become `_`,
    /// so the name always stays inside the directory it is written to.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .table_name
            .chars()
            .map(|c| {
                if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        let stem = stem.trim_start_matches('.');
        if stem.is_empty() {
            format!("{DEFAULT_TABLE_NAME}.sql")
        } else {
            format!("{stem}.sql")
        }
    }

    pub fn content_type(&self) -> &'static str {
        SQL_CONTENT_TYPE
    }
}

impl fmt::Display for SqlScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Trimmed table name, or [`DEFAULT_TABLE_NAME`] when blank.
pub fn effective_table_name(table_name: Option<&str>) -> &str {
    match table_name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_TABLE_NAME,
    }
}

/// Builds the script for `dataset`. Pure: equal inputs give equal output.
///
/// # Errors
///
/// Returns `InvalidIdentifier` for unusable table/column names,
/// `DataProcessing` for a dataset without columns and `Config` for a zero
/// batch size.
pub fn generate_script(
    dataset: &Dataset,
    table_name: Option<&str>,
    options: &ScriptOptions,
) -> Result<SqlScript> {
    let table_name = effective_table_name(table_name);
    let table_ident = render_identifier(table_name, options.identifier_style)?;
    let column_idents = dataset
        .column_names()
        .map(|name| render_identifier(name, options.identifier_style))
        .collect::<Result<Vec<_>>>()?;

    let create_table = create_table_statement(dataset, &table_ident, &column_idents)?;
    let inserts = insert_statements(dataset, &table_ident, &column_idents, options)?;

    Ok(SqlScript {
        table_name: table_name.to_owned(),
        create_table,
        inserts,
    })
}

fn create_table_statement(
    dataset: &Dataset,
    table_ident: &str,
    column_idents: &[String],
) -> Result<String> {
    if dataset.width() == 0 {
        return Err(SheetSqlError::DataProcessing(
            "the file has no columns".to_owned(),
        ));
    }

    let definitions: Vec<String> = column_idents
        .iter()
        .zip(dataset.columns())
        .map(|(ident, column)| format!(" {ident} {}", sql_type_for(column.kind)))
        .collect();

    Ok(format!(
        "CREATE TABLE {table_ident} (\n{}\n);",
        definitions.join(",\n")
    ))
}

fn insert_statements(
    dataset: &Dataset,
    table_ident: &str,
    column_idents: &[String],
    options: &ScriptOptions,
) -> Result<Vec<String>> {
    if dataset.is_empty() {
        return Ok(Vec::new());
    }

    let batch_size = match options.rows_per_insert {
        Some(0) => {
            return Err(SheetSqlError::Config(
                "rows per INSERT must be at least 1".to_owned(),
            ));
        }
        Some(n) => n,
        None => dataset.height(),
    };

    let kinds: Vec<ValueKind> = dataset.columns().iter().map(|c| c.kind).collect();
    let header = format!(
        "INSERT INTO {table_ident} ({}) VALUES\n",
        column_idents.join(", ")
    );

    Ok(dataset
        .rows()
        .chunks(batch_size)
        .map(|batch| {
            let tuples: Vec<String> = batch
                .iter()
                .map(|row| render_row(row, &kinds, options.value_policy))
                .collect();
            format!("{header}{};", tuples.join(",\n"))
        })
        .collect())
}
