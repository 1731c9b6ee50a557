use super::dataset::Dataset;
use super::io::load_dataset;
use super::naming::sanitize_column_names;
use super::script::{ScriptOptions, SqlScript, generate_script};
use crate::error::{Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Everything the user chose besides the file itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionRequest {
    pub table_name: Option<String>,
    pub options: ScriptOptions,
    pub standardise_column_names: bool,
}

/// A loaded file and the script generated from it.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub dataset: Dataset,
    pub script: SqlScript,
    pub duration: Duration,
}

/// Reads `path` and generates its script.
///
/// # Errors
///
/// Any read or generation failure; callers show it via
/// [`crate::error::user_facing_error`].
pub fn convert_file_flow(path: &Path, request: &ConversionRequest) -> Result<Conversion> {
    let start = Instant::now();
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    tracing::info!("Converting {} ({file_size} bytes)", path.display());

    let mut dataset = load_dataset(path)?;
    if request.standardise_column_names {
        let names = sanitize_column_names(&dataset.column_names().collect::<Vec<_>>());
        dataset.rename_columns(names)?;
    }

    let script = script_for(&dataset, request)?;
    let duration = start.elapsed();

    tracing::info!(
        "Generated script for table {} ({} columns, {} rows) in {:.2}s",
        script.table_name(),
        dataset.width(),
        dataset.height(),
        duration.as_secs_f32()
    );

    Ok(Conversion {
        file_path: path.to_path_buf(),
        file_size,
        dataset,
        script,
        duration,
    })
}

/// Regenerates a script from an already loaded dataset, e.g. after the
/// table name changes.
///
/// # Errors
///
/// See [`generate_script`].
pub fn script_for(dataset: &Dataset, request: &ConversionRequest) -> Result<SqlScript> {
    generate_script(dataset, request.table_name.as_deref(), &request.options)
}

/// Writes the script as UTF-8. A directory target receives `<table_name>.sql`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_script(script: &SqlScript, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(script.file_name())
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, script.text())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved SQL script to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::values::ValuePolicy;
    use tempfile::tempdir;

    const CSV: &str = "Student ID,Full Name,score\n1,Alice,91.5\n2,Bob,\n";

    #[test]
    fn test_convert_csv_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("students.csv");
        std::fs::write(&path, CSV)?;

        let request = ConversionRequest {
            table_name: Some("students".to_owned()),
            standardise_column_names: true,
            ..Default::default()
        };
        let conversion = convert_file_flow(&path, &request)?;

        assert_eq!(conversion.dataset.height(), 2);
        assert_eq!(
            conversion.script.create_table(),
            "CREATE TABLE students (\n student_id INT,\n full_name VARCHAR(255),\n score FLOAT\n);"
        );
        assert!(conversion.script.text().ends_with("(2, 'Bob', NULL);"));
        Ok(())
    }

    #[test]
    fn test_script_for_follows_request() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("students.csv");
        std::fs::write(&path, CSV)?;

        let mut request = ConversionRequest::default();
        let conversion = convert_file_flow(&path, &request)?;
        assert_eq!(conversion.script.table_name(), "table_name");

        request.table_name = Some("renamed".to_owned());
        request.options.value_policy = ValuePolicy::QuoteAll;
        request.options.identifier_style = crate::generator::naming::IdentifierStyle::Backtick;
        let script = script_for(&conversion.dataset, &request)?;
        assert!(script.text().contains("INSERT INTO `renamed`"));
        assert!(script.text().ends_with("('2', 'Bob', 'nan');"));
        Ok(())
    }

    #[test]
    fn test_write_script_into_directory() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("students.csv");
        std::fs::write(&path, CSV)?;
        let request = ConversionRequest {
            table_name: Some("students".to_owned()),
            standardise_column_names: true,
            ..Default::default()
        };
        let conversion = convert_file_flow(&path, &request)?;

        let written = write_script(&conversion.script, dir.path())?;
        assert_eq!(written, dir.path().join("students.sql"));
        assert_eq!(std::fs::read_to_string(written)?, conversion.script.text());

        let explicit = write_script(&conversion.script, &dir.path().join("out/custom.sql"))?;
        assert!(explicit.ends_with("out/custom.sql"));
        Ok(())
    }

    #[test]
    fn test_write_script_stays_in_target_directory() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("students.csv");
        std::fs::write(&path, CSV)?;
        let out = dir.path().join("out");
        std::fs::create_dir(&out)?;

        let request = ConversionRequest {
            table_name: Some("../escaped".to_owned()),
            standardise_column_names: true,
            ..Default::default()
        };
        let conversion = convert_file_flow(&path, &request)?;
        let written = write_script(&conversion.script, &out)?;

        assert_eq!(written, out.join("_escaped.sql"));
        assert!(!dir.path().join("escaped.sql").exists());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = convert_file_flow(Path::new("does/not/exist.csv"), &ConversionRequest::default());
        assert!(result.is_err());
    }
}
