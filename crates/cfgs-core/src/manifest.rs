//! Manifest reader: which tables get exported

use crate::error::Result;
use crate::reader::load_sheet;
use crate::table::{CellValue, Grid};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Default manifest file name inside the source directory
pub const DEFAULT_MANIFEST: &str = "configlist.xlsx";

/// Default manifest sheet name
pub const DEFAULT_SHEET: &str = "Sheet1";

/// One row of the manifest
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    /// Ordinal column, as written
    pub ordinal: CellValue,
    /// Table file name, usually without extension
    pub table: String,
    /// Free-text description
    pub description: String,
    /// Export-to-client flag
    pub export_client: bool,
    /// Export-to-server flag (not used by this tool)
    pub export_server: bool,
}

impl ManifestEntry {
    /// Source file name for the table: names mentioning `.xlsx` are kept,
    /// anything else is a text table with `.txt` appended.
    pub fn file_name(&self) -> String {
        if self.table.contains(".xlsx") {
            self.table.clone()
        } else {
            format!("{}.txt", self.table)
        }
    }
}

/// The parsed manifest
#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load the manifest from a named sheet of a workbook
    pub fn load<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Self> {
        let grid = load_sheet(path, sheet)?;
        Ok(Self::from_grid(&grid))
    }

    /// Build the manifest from a grid; row 0 is the header and is skipped
    pub fn from_grid(grid: &Grid) -> Self {
        let entries = grid
            .iter()
            .skip(1)
            .map(|row| {
                let cell = |i: usize| row.get(i).cloned().unwrap_or(CellValue::Empty);
                ManifestEntry {
                    ordinal: cell(0),
                    table: cell(1).to_string_value(),
                    description: cell(2).to_string_value(),
                    export_client: cell(3).is_flag_set(),
                    export_server: cell(4).is_flag_set(),
                }
            })
            .collect();

        Self { entries }
    }

    /// Entries flagged for export, in manifest order
    pub fn exported(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|entry| {
            if entry.export_client && entry.table.is_empty() {
                warn!("manifest entry {} is flagged for export but names no table", entry.ordinal);
                return false;
            }
            entry.export_client
        })
    }

    /// File names of the exported tables
    pub fn exported_files(&self) -> Vec<String> {
        self.exported().map(ManifestEntry::file_name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::parse(c)).collect()
    }

    fn manifest() -> Manifest {
        Manifest::from_grid(&vec![
            row(&["No", "Table", "Desc", "Client", "Server"]),
            row(&["1", "gift", "rewards", "1", "1"]),
            row(&["2", "item", "items", "0", "1"]),
            row(&["3", "hero.xlsx", "heroes", "1", "0"]),
            row(&["4", "shop", "shops", "yes", "1"]),
            row(&["5", "npc", "npcs", "2", "1"]),
            row(&["6", "quest"]),
        ])
    }

    #[test]
    fn test_header_row_is_skipped() {
        assert_eq!(manifest().entries.len(), 6);
    }

    #[test]
    fn test_only_flag_one_is_exported() {
        assert_eq!(manifest().exported_files(), vec!["gift.txt", "hero.xlsx"]);
    }

    #[test]
    fn test_numeric_flag_from_workbook() {
        let m = Manifest::from_grid(&vec![
            row(&["No", "Table", "Desc", "Client", "Server"]),
            vec![
                CellValue::Integer(1),
                CellValue::String("gift".to_string()),
                CellValue::Empty,
                CellValue::Float(1.0),
            ],
        ]);
        assert_eq!(m.exported_files(), vec!["gift.txt"]);
        assert!(!m.entries[0].export_server);
    }

    #[test]
    fn test_entry_without_table_name_is_ignored() {
        let m = Manifest::from_grid(&vec![
            row(&["No", "Table", "Desc", "Client"]),
            row(&["1", "", "", "1"]),
        ]);
        assert!(m.exported_files().is_empty());
    }
}
