//! # sheetsql - spreadsheet to SQL script generator
//!
//! Reads an Excel workbook (`.xlsx`, `.xls`) or a CSV file and turns it into
//! a `CREATE TABLE` statement plus `INSERT INTO` statements for its rows.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetsql::generator::{ConversionRequest, convert_file_flow};
//! use std::path::Path;
//!
//! let request = ConversionRequest {
//!     table_name: Some("students".to_owned()),
//!     ..Default::default()
//! };
//! let conversion = convert_file_flow(Path::new("students.xlsx"), &request)?;
//!
//! println!("{}", conversion.script);
//! # Ok::<(), sheetsql::error::SheetSqlError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`generator`]: Reading files and generating the script
//!   - [`generator::script`]: `CREATE TABLE` / `INSERT INTO` rendering
//!   - [`generator::io`]: Excel and CSV readers
//! - [`config`]: Persisted user settings
//! - [`error`]: Error types and the user-facing error message
//! - [`logging`]: Tracing setup (stderr and a daily log file)
//!
//! ## Type Mapping
//!
//! | Column kind | SQL type       |
//! |-------------|----------------|
//! | integer     | `INT`          |
//! | float       | `FLOAT`        |
//! | text        | `VARCHAR(255)` |
//! | timestamp   | `DATETIME`     |
//! | boolean     | `BOOLEAN`      |
//!
//! Anything else falls back to `VARCHAR(255)`.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
