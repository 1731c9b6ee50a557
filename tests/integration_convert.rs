//! Integration tests for the full file-to-script workflow
//!
//! These tests load fixture files from `testdata/` and check the generated
//! SQL text end to end.

#![expect(clippy::unwrap_used)]

use sheetsql::error::{SheetSqlError, user_facing_error};
use sheetsql::generator::{
    ConversionRequest, IdentifierStyle, SQL_CONTENT_TYPE, ValuePolicy, convert_file_flow,
    write_script,
};
use std::path::PathBuf;

fn request(table_name: &str) -> ConversionRequest {
    ConversionRequest {
        table_name: Some(table_name.to_owned()),
        ..Default::default()
    }
}

#[test]
fn test_students_csv_typed_script() {
    let conversion =
        convert_file_flow(&PathBuf::from("testdata/students.csv"), &request("students")).unwrap();

    assert_eq!(conversion.dataset.height(), 3, "Should have 3 rows");
    assert_eq!(conversion.dataset.width(), 3, "Should have 3 columns");

    let expected = "CREATE TABLE students (\n id INT,\n name VARCHAR(255),\n score FLOAT\n);\n\n\
                    INSERT INTO students (id, name, score) VALUES\n\
                    (1, 'Alice', 91.5),\n\
                    (2, 'Bob', NULL),\n\
                    (3, 'O''Brien', 78.25);";
    assert_eq!(conversion.script.text(), expected);
    assert_eq!(conversion.script.file_name(), "students.sql");
    assert_eq!(conversion.script.content_type(), SQL_CONTENT_TYPE);
}

#[test]
fn test_students_xlsx_typed_script() {
    let conversion =
        convert_file_flow(&PathBuf::from("testdata/students.xlsx"), &request("students")).unwrap();

    assert_eq!(conversion.dataset.height(), 3, "Should have 3 rows");
    assert_eq!(conversion.dataset.width(), 5, "Should have 5 columns");

    let expected = "CREATE TABLE students (\n id INT,\n name VARCHAR(255),\n score FLOAT,\n \
                    enrolled DATETIME,\n active BOOLEAN\n);\n\n\
                    INSERT INTO students (id, name, score, enrolled, active) VALUES\n\
                    (1, 'Alice', 91.5, '2023-09-01 00:00:00', TRUE),\n\
                    (2, 'Bob', NULL, '2023-09-02 00:00:00', FALSE),\n\
                    (3, 'O''Brien', 78.25, '2023-09-03 00:00:00', TRUE);";
    assert_eq!(conversion.script.text(), expected);
}

#[test]
fn test_xlsx_headers_and_preview() {
    let path = PathBuf::from("testdata/students.xlsx");
    let dataset = sheetsql::generator::load_dataset(&path).unwrap();

    assert_eq!(
        dataset.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "score", "enrolled", "active"]
    );
    assert_eq!(dataset.head(2).len(), 2, "Preview should honour the row limit");
}

#[test]
fn test_quote_all_writes_every_value_as_string() {
    let mut req = request("students");
    req.options.value_policy = ValuePolicy::QuoteAll;
    let conversion = convert_file_flow(&PathBuf::from("testdata/students.csv"), &req).unwrap();

    let inserts = conversion.script.inserts();
    assert_eq!(inserts.len(), 1, "Should produce a single INSERT");
    assert!(inserts[0].contains("('1', 'Alice', '91.5')"));
    assert!(inserts[0].contains("('2', 'Bob', 'nan')"));
    assert!(inserts[0].contains("('3', 'O''Brien', '78.25')"));
}

#[test]
fn test_blank_table_name_uses_default() {
    let req = ConversionRequest {
        table_name: Some(String::new()),
        ..Default::default()
    };
    let conversion = convert_file_flow(&PathBuf::from("testdata/students.csv"), &req).unwrap();

    assert!(conversion.script.create_table().starts_with("CREATE TABLE table_name ("));
    assert_eq!(conversion.script.file_name(), "table_name.sql");
}

#[test]
fn test_generation_is_repeatable() {
    let path = PathBuf::from("testdata/students.csv");
    let first = convert_file_flow(&path, &request("students")).unwrap();
    let second = convert_file_flow(&path, &request("students")).unwrap();

    assert_eq!(first.script, second.script);
}

#[test]
fn test_standardised_names_and_timestamps() {
    let req = ConversionRequest {
        table_name: Some("enrolments".to_owned()),
        standardise_column_names: true,
        ..Default::default()
    };
    let conversion = convert_file_flow(&PathBuf::from("testdata/enrolments.csv"), &req).unwrap();

    assert_eq!(
        conversion.script.create_table(),
        "CREATE TABLE enrolments (\n student_id INT,\n full_name VARCHAR(255),\n enrolled_on DATETIME\n);"
    );
    assert!(
        conversion
            .script
            .text()
            .contains("(10, 'Carla', '2024-01-15 08:30:00')"),
        "Timestamps should be written as quoted literals"
    );
}

#[test]
fn test_backtick_identifiers_keep_original_headers() {
    let mut req = request("enrolments");
    req.options.identifier_style = IdentifierStyle::Backtick;
    let conversion = convert_file_flow(&PathBuf::from("testdata/enrolments.csv"), &req).unwrap();

    assert!(
        conversion
            .script
            .text()
            .contains("INSERT INTO `enrolments` (`Student ID`, `Full Name`, `Enrolled On`) VALUES")
    );
}

#[test]
fn test_rows_per_insert_splits_statements() {
    let mut req = request("students");
    req.options.rows_per_insert = Some(2);
    let conversion = convert_file_flow(&PathBuf::from("testdata/students.csv"), &req).unwrap();

    let inserts = conversion.script.inserts();
    assert_eq!(inserts.len(), 2);
    assert!(inserts[0].ends_with("(2, 'Bob', NULL);"));
    assert!(inserts[1].ends_with("(3, 'O''Brien', 78.25);"));
}

#[test]
fn test_header_only_csv_has_no_insert() {
    let conversion =
        convert_file_flow(&PathBuf::from("testdata/header_only.csv"), &request("empty")).unwrap();

    assert_eq!(conversion.dataset.height(), 0);
    assert!(conversion.script.create_table().starts_with("CREATE TABLE empty (\n id "));
    assert!(conversion.script.inserts().is_empty());
    assert!(!conversion.script.text().contains("INSERT INTO"));
}

#[test]
fn test_unsupported_extension_message() {
    let err = convert_file_flow(&PathBuf::from("testdata/notes.txt"), &request("notes")).unwrap_err();

    assert!(matches!(err, SheetSqlError::UnsupportedFormat(ref ext) if ext == "txt"));
    assert_eq!(
        user_facing_error(&err),
        "Error processing the file: Unsupported file extension: txt"
    );
}

#[test]
fn test_write_script_to_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let conversion = convert_file_flow(&PathBuf::from("testdata/students.csv"), &request("students"))?;

    let path = write_script(&conversion.script, dir.path())?;
    assert_eq!(path, dir.path().join("students.sql"));
    assert_eq!(std::fs::read_to_string(&path)?, conversion.script.text());
    Ok(())
}
