//! cfgs-core: Core library for exporting spreadsheet config tables
//!
//! This library provides functionality to:
//! - Read the manifest that selects which tables are exported
//! - Load tables from workbooks or legacy-encoded delimited text
//! - Coerce cells by their declared column type into id-keyed records
//! - Write all records as one zipped JSON bundle
//! - Write matching type declarations for the records

pub mod bundle;
pub mod config;
pub mod declarations;
pub mod error;
pub mod manifest;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod table;
pub mod value;

pub use bundle::{read_bundle, write_bundle, Bundle};
pub use config::ExportConfig;
pub use declarations::{render_declarations, write_declarations};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestEntry};
pub use parser::{parse_grid, parse_table};
pub use pipeline::{export, load_tables, ExportSummary, TableSummary};
pub use reader::{load_grid, load_sheet};
pub use table::{CellValue, Column, ColumnType, Grid, Record, Table};
pub use value::{coerce, parse_float, parse_int, FieldValue, Number};
