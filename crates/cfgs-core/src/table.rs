//! Core table types for representing parsed config tables

use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A raw sheet: rows of cells, rows may be ragged
pub type Grid = Vec<Vec<CellValue>>;

/// One exported data row, addressed by property name
pub type Record = IndexMap<String, FieldValue>;

/// A parsed config table
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Base name (file name without its extension), used as the bundle key
    pub name: String,
    /// Source file name as resolved from the manifest
    pub file_name: String,
    /// Records keyed by the string form of their id cell
    pub records: IndexMap<String, Record>,
    /// Exported column descriptors, in column order
    pub columns: Vec<Column>,
    /// Number of accepted data rows (duplicate ids are counted twice)
    pub record_count: usize,
}

impl Table {
    /// Create a new empty table
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            name: base_name(&file_name).to_string(),
            file_name,
            records: IndexMap::new(),
            columns: Vec::new(),
            record_count: 0,
        }
    }

    /// Find an exported column by property name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Find a record by id
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }
}

/// Strip the last extension from a file name ("gift.txt" -> "gift")
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => &file_name[..pos],
        None => file_name,
    }
}

/// Declared type of a column, from the first header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// `INT`
    Int,
    /// `FLOAT`
    Float,
    /// `[INT]`
    IntList,
    /// `[STRING]`
    StringList,
    /// Anything else; cells pass through as read
    Text,
}

impl ColumnType {
    /// Parse a type tag. A leading byte-order mark is ignored.
    pub fn parse(tag: &str) -> Self {
        match tag.strip_prefix('\u{feff}').unwrap_or(tag) {
            "INT" => ColumnType::Int,
            "FLOAT" => ColumnType::Float,
            "[INT]" => ColumnType::IntList,
            "[STRING]" => ColumnType::StringList,
            _ => ColumnType::Text,
        }
    }

    /// Type used for this column in the generated declarations
    pub fn declared_type(self) -> &'static str {
        match self {
            ColumnType::Int | ColumnType::Float => "number",
            ColumnType::IntList => "number[]",
            ColumnType::StringList => "string[]",
            ColumnType::Text => "string",
        }
    }
}

/// A column descriptor built from the four header rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column index (0-based)
    pub index: usize,
    /// Property name written into records
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
    /// Whether the column is exported (always true for column 0)
    pub exported: bool,
    /// Free-text description, carried into the declarations
    pub description: String,
}

/// A cell value as read from the source sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type.
    ///
    /// Only zero-length fields are empty. Numbers are detected on the
    /// trimmed text; anything kept as a string keeps its spaces and case.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Empty;
        }

        match s {
            "TRUE" => return CellValue::Bool(true),
            "FALSE" => return CellValue::Bool(false),
            _ => {}
        }

        let trimmed = s.trim();

        // Try parsing as integer first
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // Rust also accepts "inf"/"NaN", which should stay text
        if looks_numeric(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return CellValue::Float(f);
            }
        }

        // Otherwise, keep as string
        CellValue::String(s.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Loose comparison against the export flag value `1`.
    ///
    /// Numbers equal to one, `true`, and strings that read as the number one
    /// match. Other values such as `2` or `"yes"` do not.
    pub fn is_flag_set(&self) -> bool {
        match self {
            CellValue::Integer(i) => *i == 1,
            CellValue::Float(f) => *f == 1.0,
            CellValue::Bool(b) => *b,
            CellValue::String(s) => s.trim().parse::<f64>().is_ok_and(|f| f == 1.0),
            CellValue::Empty => false,
        }
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => format_number(*f),
            CellValue::Bool(b) => b.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// Render a float the way a script runtime prints numbers: integral values
/// lose their fractional part, non-finite values are spelled out.
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
}
