//! The export run: manifest, tables, bundle, declarations

use crate::bundle::{bundle_size, write_bundle};
use crate::config::ExportConfig;
use crate::declarations::write_declarations;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::parser::parse_table;
use crate::table::Table;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Per-table line of the summary
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub records: usize,
    pub columns: usize,
}

/// What an export run produced
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub tables: Vec<TableSummary>,
    pub bundle_path: PathBuf,
    pub bundle_bytes: u64,
    pub declarations_path: PathBuf,
}

impl ExportSummary {
    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }
}

/// Parse every table the manifest selects, in manifest order.
///
/// Stops at the first table that cannot be read.
pub fn load_tables(config: &ExportConfig) -> Result<Vec<Table>> {
    let encoding = config.validate()?;
    let manifest = Manifest::load(config.manifest_path(), &config.manifest_sheet)?;

    let mut tables = Vec::new();
    for file_name in manifest.exported_files() {
        let table = parse_table(config.table_path(&file_name), &file_name, encoding)?;
        info!("{}: {} records", file_name, table.record_count);
        tables.push(table);
    }

    Ok(tables)
}

/// Run a full export. Nothing is written unless every table parsed.
pub fn export(config: &ExportConfig) -> Result<ExportSummary> {
    info!("source: {}", config.source_dir.display());
    info!("target: {}", config.target_dir.display());

    let tables = load_tables(config)?;

    let bundle_path = config.bundle_path();
    write_bundle(&tables, &bundle_path, &config.bundle_entry)?;

    let declarations_path = config.declarations_path();
    write_declarations(&tables, &declarations_path, &config.namespace)?;

    Ok(ExportSummary {
        tables: tables
            .iter()
            .map(|t| TableSummary {
                name: t.name.clone(),
                records: t.record_count,
                columns: t.columns.len(),
            })
            .collect(),
        bundle_bytes: bundle_size(&bundle_path)?,
        bundle_path,
        declarations_path,
    })
}
