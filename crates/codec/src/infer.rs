//! Cell type inference and parsing
//!
//! Types are inferred from the first data row of each column, narrowest
//! first: int32, int64, float32, character (length 1), string. Later rows
//! parse under the fixed tag.

use cartflow_frame::{TypeTag, Value};

/// Infer the narrowest type for a raw cell
pub fn infer_tag(cell: &str) -> TypeTag {
    if is_integer(cell) {
        if cell.parse::<i32>().is_ok() {
            return TypeTag::Int32;
        }
        if cell.parse::<i64>().is_ok() {
            return TypeTag::Int64;
        }
        // Digits that overflow i64 fall through to string
        return TypeTag::Str;
    }
    if is_float(cell) && cell.parse::<f32>().is_ok() {
        return TypeTag::Float32;
    }
    if cell.chars().count() == 1 {
        return TypeTag::Char;
    }
    TypeTag::Str
}

/// Parse a raw cell under a fixed tag
///
/// Character cells take the first character, matching the delimited format
/// the reference producer emits. Returns a reason string on failure.
pub fn parse_as(tag: TypeTag, cell: &str) -> Result<Value, String> {
    match tag {
        TypeTag::Int32 => cell
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|_| format!("expected int32, got '{cell}'")),
        TypeTag::Int64 => cell
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|_| format!("expected int64, got '{cell}'")),
        TypeTag::Float32 => cell
            .parse::<f32>()
            .map(Value::Float32)
            .map_err(|_| format!("expected float32, got '{cell}'")),
        TypeTag::Float64 => cell
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|_| format!("expected float64, got '{cell}'")),
        TypeTag::Char => cell
            .chars()
            .next()
            .map(Value::Char)
            .ok_or_else(|| "expected a character, got an empty cell".to_string()),
        TypeTag::Str => Ok(Value::Str(cell.to_string())),
    }
}

fn is_integer(cell: &str) -> bool {
    let digits = cell.strip_prefix('-').unwrap_or(cell);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_float(cell: &str) -> bool {
    let body = cell.strip_prefix('-').unwrap_or(cell);
    body.chars().filter(|&c| c == '.').count() == 1
        && body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| c.is_ascii_digit() || c == '.')
}
