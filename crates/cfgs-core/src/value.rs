//! Typed record values and cell coercion

use crate::table::{CellValue, ColumnType};
use serde::{Serialize, Serializer};

/// Separator for list-typed cells
pub const LIST_SEPARATOR: char = '|';

/// A numeric value. `Float(NaN)` is the not-a-number marker produced by
/// failed numeric parses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The not-a-number marker
    pub const NAN: Number = Number::Float(f64::NAN);

    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Float(f) if f.is_nan())
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::Int(i) => serializer.serialize_i64(i),
            // JSON has no NaN or infinity; they are written as null
            Number::Float(f) if !f.is_finite() => serializer.serialize_none(),
            Number::Float(f) if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
                serializer.serialize_i64(f as i64)
            }
            Number::Float(f) => serializer.serialize_f64(f),
        }
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A coerced value stored in a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
    Bool(bool),
    Numbers(Vec<Number>),
    Texts(Vec<String>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<Number> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Coerce a cell according to its column type.
///
/// Returns `None` for empty cells; the caller leaves the property out of
/// the record. Numeric parse failures yield [`Number::NAN`].
pub fn coerce(cell: &CellValue, column_type: ColumnType) -> Option<FieldValue> {
    if cell.is_empty() {
        return None;
    }

    let value = match column_type {
        ColumnType::Int => FieldValue::Number(to_int(cell)),
        ColumnType::Float => FieldValue::Number(to_float(cell)),
        ColumnType::IntList => FieldValue::Numbers(
            split_list(&cell.to_string_value())
                .map(parse_int)
                .collect(),
        ),
        ColumnType::StringList => FieldValue::Texts(
            split_list(&cell.to_string_value())
                .map(str::to_string)
                .collect(),
        ),
        ColumnType::Text => match cell {
            CellValue::Integer(i) => FieldValue::Number(Number::Int(*i)),
            CellValue::Float(f) => FieldValue::Number(Number::Float(*f)),
            CellValue::Bool(b) => FieldValue::Bool(*b),
            CellValue::String(s) => FieldValue::Text(s.clone()),
            CellValue::Empty => return None,
        },
    };

    Some(value)
}

fn to_int(cell: &CellValue) -> Number {
    match cell {
        CellValue::Integer(i) => Number::Int(*i),
        CellValue::Float(f) if f.is_finite() => {
            let truncated = f.trunc();
            if truncated.abs() < MAX_SAFE_INTEGER {
                Number::Int(truncated as i64)
            } else {
                Number::Float(truncated)
            }
        }
        CellValue::Float(_) => Number::NAN,
        other => parse_int(&other.to_string_value()),
    }
}

fn to_float(cell: &CellValue) -> Number {
    match cell {
        CellValue::Integer(i) => Number::Int(*i),
        CellValue::Float(f) => Number::Float(*f),
        other => parse_float(&other.to_string_value()),
    }
}

/// Split a list cell. An empty cell text gives an empty list.
fn split_list(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = text.split(LIST_SEPARATOR);
    if text.is_empty() {
        parts.next();
    }
    parts
}

fn trim_leading(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Integer prefix parse.
///
/// Leading whitespace is skipped, an optional sign and `0x` prefix are
/// honored, and parsing stops at the first non-digit. No digits at all
/// gives the not-a-number marker.
pub fn parse_int(s: &str) -> Number {
    let s = trim_leading(s);
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return Number::NAN;
    }

    match i64::from_str_radix(digits, radix) {
        Ok(v) => Number::Int(if negative { -v } else { v }),
        Err(_) => {
            // Too wide for i64, keep the magnitude as a float
            let v = digits.chars().fold(0.0_f64, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            });
            Number::Float(if negative { -v } else { v })
        }
    }
}

/// Floating-point prefix parse.
///
/// Accepts the longest prefix of the form `[sign]digits[.digits][e[sign]digits]`
/// or `[sign]Infinity`. Nothing parseable gives the not-a-number marker.
pub fn parse_float(s: &str) -> Number {
    let s = trim_leading(s);
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Number::Float(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if mantissa_digits > 0 || j > frac_start {
            mantissa_digits += j - frac_start;
            end = j;
        }
    }

    if mantissa_digits == 0 {
        return Number::NAN;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < len && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end]
        .parse::<f64>()
        .map_or(Number::NAN, Number::Float)
}
