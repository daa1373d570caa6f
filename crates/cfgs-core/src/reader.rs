//! Grid loading for spreadsheet workbooks and legacy-encoded text tables

use crate::error::{Error, Result};
use crate::table::{CellValue, Grid};
use calamine::{open_workbook_auto, Data, Range, Reader};
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Extensions opened as native workbooks; anything else is delimited text
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Largest integer a double represents exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whether the path names a native spreadsheet format
pub fn is_workbook<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Load the first sheet of a table file.
///
/// Workbooks ignore `encoding`; text files are decoded with it first.
pub fn load_grid<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<Grid> {
    let path = path.as_ref();
    if is_workbook(path) {
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::Workbook {
            path: path.to_path_buf(),
            source: e,
        })?;

        let Some(first) = workbook.sheet_names().first().cloned() else {
            return Ok(Grid::new());
        };

        let range = workbook.worksheet_range(&first).map_err(|e| Error::Workbook {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(range_to_grid(&range))
    } else {
        let bytes = fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let (text, used, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{}: some bytes are not valid {}, replaced",
                path.display(),
                used.name()
            );
        }
        parse_delimited(&text, path)
    }
}

/// Load a sheet by name from a workbook
pub fn load_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Grid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::Workbook {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(Error::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        });
    }

    let range = workbook.worksheet_range(sheet).map_err(|e| Error::Workbook {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(range_to_grid(&range))
}

/// Parse decoded delimited text into a grid. No row is treated as a header.
pub fn parse_delimited(content: &str, source: &Path) -> Result<Grid> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Allow varying number of fields
        .delimiter(sniff_delimiter(content))
        .from_reader(content.as_bytes());

    let mut grid = Grid::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        grid.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(grid)
}

/// Pick the delimiter that occurs most often in the first line
fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or_default();
    let mut best = (b',', 0);
    for candidate in [b',', b'\t', b';'] {
        let count = first_line.bytes().filter(|b| *b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect()
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => number_cell(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        // Dates stay as their serial number
        Data::DateTime(dt) => number_cell(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

/// Workbooks store every number as a double; integral ones become integers
fn number_cell(f: f64) -> CellValue {
    if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}
