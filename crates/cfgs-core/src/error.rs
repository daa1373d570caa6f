//! Error types for cfgs-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cfgs-core
#[derive(Debug, Error)]
pub enum Error {
    /// Output directory for the bundle is missing
    #[error("target directory '{0}' does not exist")]
    MissingTargetDir(PathBuf),

    /// Text encoding label could not be resolved
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    /// A table listed in the manifest has no source file
    #[error("table file '{0}' does not exist")]
    TableNotFound(PathBuf),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet could not be opened or read
    #[error("failed to read workbook '{path}': {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Named sheet missing from a workbook
    #[error("sheet '{sheet}' not found in '{path}'")]
    SheetNotFound { sheet: String, path: PathBuf },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Archive writing error
    #[error("failed to write archive '{path}': {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Bundle was written but is not on disk afterwards
    #[error("bundle '{0}' is missing after write")]
    BundleMissing(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
