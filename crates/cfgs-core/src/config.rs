//! Export configuration, passed explicitly through every stage

use crate::bundle::{DEFAULT_BUNDLE_ENTRY, DEFAULT_BUNDLE_NAME};
use crate::declarations::{DEFAULT_DECLARATIONS_NAME, DEFAULT_NAMESPACE};
use crate::error::{Error, Result};
use crate::manifest::{DEFAULT_MANIFEST, DEFAULT_SHEET};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default encoding of delimited text tables
pub const DEFAULT_ENCODING: &str = "gbk";

/// Paths and names used by one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory holding the manifest and the table files
    pub source_dir: PathBuf,
    /// Directory the bundle archive is written to; must exist
    pub target_dir: PathBuf,
    /// Directory the declarations file is written to
    pub interface_dir: PathBuf,
    pub manifest_name: String,
    pub manifest_sheet: String,
    /// Encoding label for text tables (e.g. "gbk", "utf-8")
    pub encoding: String,
    pub bundle_name: String,
    pub bundle_entry: String,
    pub declarations_name: String,
    pub namespace: String,
}

impl ExportConfig {
    /// Create a config with default names
    pub fn new(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        interface_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            interface_dir: interface_dir.into(),
            manifest_name: DEFAULT_MANIFEST.to_string(),
            manifest_sheet: DEFAULT_SHEET.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
            bundle_entry: DEFAULT_BUNDLE_ENTRY.to_string(),
            declarations_name: DEFAULT_DECLARATIONS_NAME.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_manifest(mut self, name: impl Into<String>, sheet: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self.manifest_sheet = sheet.into();
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    pub fn with_bundle(mut self, name: impl Into<String>, entry: impl Into<String>) -> Self {
        self.bundle_name = name.into();
        self.bundle_entry = entry.into();
        self
    }

    pub fn with_declarations(
        mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.declarations_name = name.into();
        self.namespace = namespace.into();
        self
    }

    /// Check the configuration before any table is read.
    ///
    /// Returns the resolved text encoding.
    pub fn validate(&self) -> Result<&'static Encoding> {
        if !self.target_dir.exists() {
            return Err(Error::MissingTargetDir(self.target_dir.clone()));
        }
        self.resolve_encoding()
    }

    /// Resolve the encoding label
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(self.encoding.clone()))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.source_dir.join(&self.manifest_name)
    }

    pub fn table_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.source_dir.join(file_name)
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.target_dir.join(&self.bundle_name)
    }

    pub fn declarations_path(&self) -> PathBuf {
        self.interface_dir.join(&self.declarations_name)
    }
}
