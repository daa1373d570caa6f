//! Table parser: header rows to column descriptors, data rows to records

use crate::error::{Error, Result};
use crate::reader::load_grid;
use crate::table::{CellValue, Column, ColumnType, Grid, Record, Table};
use crate::value::coerce;
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, warn};

/// Header row holding type tags
pub const TYPE_ROW: usize = 0;
/// Header row holding property names
pub const NAME_ROW: usize = 1;
/// Header row holding export flags
pub const FLAG_ROW: usize = 2;
/// Header row holding descriptions
pub const DESCRIPTION_ROW: usize = 3;
/// First data row
pub const FIRST_DATA_ROW: usize = 4;

/// Property name the first column is forced to
pub const ID_COLUMN: &str = "id";

/// Marker that comments out a data row when found in its id cell
pub const COMMENT_MARKER: char = '#';

/// Parse a table file into a Table
pub fn parse_table<P: AsRef<Path>>(
    path: P,
    file_name: &str,
    encoding: &'static Encoding,
) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::TableNotFound(path.to_path_buf()));
    }

    let grid = load_grid(path, encoding)?;
    Ok(parse_grid(file_name, &grid))
}

/// Parse a loaded grid into a Table (useful for testing)
pub fn parse_grid(file_name: &str, grid: &Grid) -> Table {
    let mut table = Table::new(file_name);
    let all_columns = parse_columns(file_name, grid);

    let exported: Vec<&Column> = all_columns.iter().filter(|c| c.exported).collect();

    for (row_idx, row) in grid.iter().enumerate().skip(FIRST_DATA_ROW) {
        let id = match row.first() {
            Some(cell) if !cell.is_empty() => cell.to_string_value(),
            _ => {
                debug!("{}: row {} has no id, skipped", file_name, row_idx);
                continue;
            }
        };
        if id.contains(COMMENT_MARKER) {
            debug!("{}: row {} is commented out", file_name, row_idx);
            continue;
        }

        let mut record = Record::new();
        for column in &exported {
            let cell = row.get(column.index).unwrap_or(&CellValue::Empty);
            if let Some(value) = coerce(cell, column.column_type) {
                record.insert(column.name.clone(), value);
            }
        }

        table.records.insert(id, record);
        table.record_count += 1;
    }

    table.columns = all_columns.into_iter().filter(|c| c.exported).collect();
    table
}

/// Build descriptors for every column named by the export flag row
fn parse_columns(file_name: &str, grid: &Grid) -> Vec<Column> {
    let header = |i: usize| grid.get(i).map(Vec::as_slice).unwrap_or_default();
    let types = header(TYPE_ROW);
    let names = header(NAME_ROW);
    let flags = header(FLAG_ROW);
    let descriptions = header(DESCRIPTION_ROW);
    let text = |row: &[CellValue], i: usize| {
        row.get(i)
            .map(CellValue::to_string_value)
            .unwrap_or_default()
    };

    let id_name = text(names, 0);
    if id_name != ID_COLUMN {
        warn!(
            "{}: first column is named '{}', renamed to '{}'",
            file_name, id_name, ID_COLUMN
        );
    }

    let mut columns = Vec::new();
    for index in 0..flags.len().max(1) {
        let mut exported = index == 0 || flags[index].is_flag_set();
        let name = if index == 0 {
            ID_COLUMN.to_string()
        } else {
            text(names, index)
        };

        if exported && name.is_empty() {
            warn!("{}: column {} is exported but has no name, skipped", file_name, index);
            exported = false;
        }

        columns.push(Column {
            index,
            name,
            column_type: ColumnType::parse(&text(types, index)),
            exported,
            description: text(descriptions, index),
        });
    }

    columns
}
