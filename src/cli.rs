use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sheetsql::config::AppSettings;
use sheetsql::generator::{
    Dataset, IdentifierStyle, ValuePolicy, convert_file_flow, load_dataset, sql_type_for,
    write_script,
};
use std::io::Write as _;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sheetsql",
    about = "Generate a CREATE TABLE + INSERT INTO script from an Excel or CSV file",
    long_about = "Generate a CREATE TABLE + INSERT INTO script from an Excel or CSV file.\n\nRun without a subcommand to open the desktop form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a file into a SQL script
    Convert {
        /// Input file (.xlsx, .xls or .csv)
        file: PathBuf,

        /// Target table name. Defaults to the configured name ("table_name").
        #[arg(short, long)]
        table: Option<String>,

        /// Output file or directory (a directory receives <table>.sql). Prints to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How values are written into the INSERT statement
        #[arg(long, value_enum)]
        values: Option<ValuePolicy>,

        /// Wrap table and column names in backticks
        #[arg(long)]
        quote_identifiers: bool,

        /// Split the INSERT into statements of at most this many rows
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        rows_per_insert: Option<u64>,

        /// Rewrite column names to lower snake case
        #[arg(long)]
        standardise_names: bool,
    },
    /// Show inferred column types and the first rows of a file
    Preview {
        /// Input file (.xlsx, .xls or .csv)
        file: PathBuf,

        /// Number of rows to show. Defaults to the configured preview size (10).
        #[arg(short = 'n', long)]
        rows: Option<usize>,

        /// Show every row
        #[arg(long)]
        all: bool,
    },
}

pub fn run_command(command: Commands, settings: AppSettings) -> Result<()> {
    match command {
        Commands::Convert {
            file,
            table,
            output,
            values,
            quote_identifiers,
            rows_per_insert,
            standardise_names,
        } => {
            let mut settings = settings;
            if let Some(policy) = values {
                settings.value_policy = policy;
            }
            if quote_identifiers {
                settings.identifier_style = IdentifierStyle::Backtick;
            }
            if let Some(n) = rows_per_insert {
                settings.rows_per_insert =
                    Some(usize::try_from(n).context("--rows-per-insert is too large")?);
            }
            settings.standardise_column_names |= standardise_names;
            handle_convert(file, table, output, &settings)
        }
        Commands::Preview { file, rows, all } => {
            let limit = if all {
                None
            } else {
                Some(rows.unwrap_or(settings.preview_rows))
            };
            handle_preview(file, limit)
        }
    }
}

fn handle_convert(
    file: PathBuf,
    table: Option<String>,
    output: Option<PathBuf>,
    settings: &AppSettings,
) -> Result<()> {
    let request = settings.request(table);
    let conversion = convert_file_flow(&file, &request)?;

    match output {
        Some(target) => {
            let path = write_script(&conversion.script, &target)?;
            println!(
                "Wrote {} ({} columns, {} rows) to {}",
                conversion.script.table_name(),
                conversion.dataset.width(),
                conversion.dataset.height(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", conversion.script)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn handle_preview(file: PathBuf, limit: Option<usize>) -> Result<()> {
    let dataset = load_dataset(&file)?;
    println!("{}", render_preview(&dataset, limit));
    Ok(())
}

/// Plain-text table: a schema block then the rows, columns padded to width.
pub fn render_preview(dataset: &Dataset, limit: Option<usize>) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} columns, {} rows\n\n",
        dataset.width(),
        dataset.height()
    ));
    for column in dataset.columns() {
        out.push_str(&format!(
            "  {:<24} {:<10} {}\n",
            column.name,
            column.kind,
            sql_type_for(column.kind)
        ));
    }
    out.push('\n');

    let rows = match limit {
        Some(n) => dataset.head(n),
        None => dataset.rows(),
    };
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| {
                    if v.is_missing() {
                        "NULL".to_owned()
                    } else {
                        v.to_display_string()
                    }
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = dataset.column_names().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_owned()
    };

    out.push_str(&format_line(dataset.column_names().collect()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &cells {
        out.push_str(&format_line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    if rows.len() < dataset.height() {
        out.push_str(&format!(
            "... {} more rows (use --all to show everything)\n",
            dataset.height() - rows.len()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use clap::CommandFactory as _;
    use sheetsql::generator::{Column, Value, ValueKind};

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "sheetsql",
            "convert",
            "data.xlsx",
            "--table",
            "students",
            "--values",
            "null-aware",
            "--quote-identifiers",
            "--rows-per-insert",
            "100",
        ])
        .unwrap();

        let Some(Commands::Convert {
            file,
            table,
            values,
            quote_identifiers,
            rows_per_insert,
            ..
        }) = cli.command
        else {
            panic!("expected convert");
        };
        assert_eq!(file, PathBuf::from("data.xlsx"));
        assert_eq!(table.as_deref(), Some("students"));
        assert_eq!(values, Some(ValuePolicy::NullAware));
        assert!(quote_identifiers);
        assert_eq!(rows_per_insert, Some(100));
    }

    #[test]
    fn test_zero_rows_per_insert_rejected() {
        let result = Cli::try_parse_from(["sheetsql", "convert", "a.csv", "--rows-per-insert", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand_means_gui() {
        let cli = Cli::try_parse_from(["sheetsql"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_render_preview_truncates() {
        let ds = Dataset::new(
            vec![
                Column::new("id", ValueKind::Integer),
                Column::new("name", ValueKind::Text),
            ],
            vec![
                vec![Value::Integer(1), "Alice".into()],
                vec![Value::Integer(2), Value::Null],
            ],
        )
        .unwrap();

        let full = render_preview(&ds, None);
        assert!(full.contains("id | name"));
        assert!(full.contains("2  | NULL"));
        assert!(full.contains(&format!("{:<24} {:<10} {}", "name", "Text", "VARCHAR(255)")));

        let head = render_preview(&ds, Some(1));
        assert!(head.contains("1  | Alice"));
        assert!(head.contains("... 1 more rows"));
    }
}
