//! Centralized error handling for sheetsql.
//!
//! Every fallible operation in the library returns [`Result`], whose error
//! type is the [`SheetSqlError`] enum. The variants exist so that log lines
//! and tests can tell failures apart; the presentation layers deliberately
//! do not, and render every failure through [`user_facing_error`]:
//!
//! ```
//! use sheetsql::error::{SheetSqlError, user_facing_error};
//!
//! let err = SheetSqlError::UnsupportedFormat("txt".to_owned());
//! assert_eq!(
//!     user_facing_error(&err),
//!     "Error processing the file: Unsupported file extension: txt"
//! );
//! ```
//!
//! ## Context Extension Trait
//!
//! The `ResultExt` trait adds `.context()` to any `Result` whose error can be
//! converted into a [`SheetSqlError`]:
//!
//! ```no_run
//! use sheetsql::error::ResultExt as _;
//! use std::fs;
//!
//! fn load_data() -> sheetsql::error::Result<String> {
//!     fs::read_to_string("data.csv").context("Failed to load dataset")
//! }
//! ```

use std::fmt;

/// Main error type for sheetsql operations.
#[derive(Debug)]
pub enum SheetSqlError {
    /// I/O errors (reading the upload, writing the `.sql` file)
    Io(std::io::Error),

    /// Reading or shaping tabular data (Polars, calamine, row arity, ...)
    DataProcessing(String),

    /// The input file extension has no reader
    UnsupportedFormat(String),

    /// A table or column name that cannot be embedded in SQL
    InvalidIdentifier(String),

    /// Settings or option errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for SheetSqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported file extension: {ext}"),
            Self::InvalidIdentifier(msg) => write!(f, "Invalid identifier: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SheetSqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SheetSqlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for SheetSqlError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for SheetSqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for SheetSqlError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<calamine::Error> for SheetSqlError {
    fn from(err: calamine::Error) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for sheetsql operations.
pub type Result<T> = std::result::Result<T, SheetSqlError>;

/// The single message shown to a user when a conversion fails.
///
/// Every error kind is reported the same way; a failed conversion just
/// prompts the user to try another file.
pub fn user_facing_error(err: &SheetSqlError) -> String {
    format!("Error processing the file: {err}")
}

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SheetSqlError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: SheetSqlError = e.into();
            SheetSqlError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: SheetSqlError = e.into();
            SheetSqlError::Other(format!("{}: {}", f(), err))
        })
    }
}
