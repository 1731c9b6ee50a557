//! Tabular data to SQL script conversion.
//!
//! ```text
//! file ──io──▶ Dataset ──script──▶ SqlScript (CREATE TABLE + INSERT INTO)
//! ```
//!
//! Everything except [`io`] and [`flows`] is pure: the same dataset, table
//! name and options always give byte-identical output.

pub mod dataset;
pub mod flows;
pub mod io;
pub mod naming;
pub mod script;
pub mod type_map;
pub mod values;

pub use dataset::{Column, Dataset, Value, ValueKind};
pub use flows::{Conversion, ConversionRequest, convert_file_flow, script_for, write_script};
pub use io::{SUPPORTED_EXTENSIONS, load_dataset};
pub use naming::IdentifierStyle;
pub use script::{DEFAULT_TABLE_NAME, SQL_CONTENT_TYPE, ScriptOptions, SqlScript, generate_script};
pub use type_map::sql_type_for;
pub use values::ValuePolicy;
