//! FILENAME: core/persistence/src/parse.rs
//! Header matching and cell conversion shared by the CSV and XLSX loaders.

use chrono::{Days, NaiveDate};
use dataset::{FieldDef, Schema, SchemaError, Value, ValueType};

use crate::PersistenceError;

/// Tokens that stand for an absent value in exported files.
const NULL_TOKENS: [&str; 3] = ["null", "nan", "none"];

/// For each schema field, the index of the file column carrying it.
pub(crate) fn map_columns(
    schema: &Schema,
    headers: &[String],
) -> Result<Vec<usize>, PersistenceError> {
    let headers: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    schema
        .fields()
        .iter()
        .map(|field| {
            headers.iter().position(|h| *h == field.name).ok_or_else(|| {
                PersistenceError::Schema(SchemaError::MissingField {
                    field: field.name.clone(),
                    available: headers.clone(),
                })
            })
        })
        .collect()
}

pub(crate) fn is_null_token(raw: &str) -> bool {
    raw.is_empty() || NULL_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t))
}

/// Converts one textual cell to the field's type.
/// `row` is the 1-based line of the file, header included.
pub(crate) fn parse_text(
    raw: &str,
    field: &FieldDef,
    row: usize,
) -> Result<Value, PersistenceError> {
    let raw = raw.trim();
    if is_null_token(raw) {
        return Ok(Value::Missing);
    }

    let parsed = match field.value_type {
        ValueType::Text => Some(Value::text(raw)),
        ValueType::Number => raw.parse::<f64>().ok().map(Value::Number),
        ValueType::Date => parse_date(raw).map(Value::Date),
    };

    parsed.ok_or_else(|| invalid(raw, field, row))
}

pub(crate) fn invalid(raw: &str, field: &FieldDef, row: usize) -> PersistenceError {
    PersistenceError::InvalidValue {
        row,
        column: field.name.clone(),
        value: raw.to_string(),
        expected: field.value_type,
    }
}

/// ISO dates, optionally followed by a time part, or day-first dates.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Some(day) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

/// Date of an Excel serial day number (1900 date system).
pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
