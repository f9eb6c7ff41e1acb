//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::parse::{excel_serial_to_date, invalid, map_columns, parse_text};
use crate::PersistenceError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use dataset::{FieldDef, RecordSet, Schema, Value, ValueType};
use log::info;
use std::path::Path;

/// Loads the named worksheet (the first one when `sheet` is None) using its
/// first row as headers.
pub fn load_xlsx(
    path: &Path,
    sheet: Option<&str>,
    schema: &Schema,
) -> Result<RecordSet, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = select_sheet(workbook.sheet_names(), sheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => {
            return Err(PersistenceError::InvalidFormat(format!(
                "Sheet '{}' has no header row",
                sheet_name
            )))
        }
    };
    let columns = map_columns(schema, &headers)?;

    let mut records = RecordSet::with_capacity(schema.clone(), range.height().saturating_sub(1));
    for (index, row) in rows.enumerate() {
        let line = index + 2;
        let values = schema
            .fields()
            .iter()
            .zip(&columns)
            .map(|(field, &col)| convert_cell(row.get(col).unwrap_or(&Data::Empty), field, line))
            .collect::<Result<Vec<_>, _>>()?;

        records.push(values)?;
    }

    info!(
        target: "LOAD",
        "loaded {} records from {} [{}]",
        records.len(),
        path.display(),
        sheet_name
    );
    Ok(records)
}

/// Header names of the selected worksheet.
pub fn xlsx_headers(path: &Path, sheet: Option<&str>) -> Result<Vec<String>, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = select_sheet(workbook.sheet_names(), sheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    Ok(range
        .rows()
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default())
}

fn select_sheet(sheet_names: Vec<String>, sheet: Option<&str>) -> Result<String, PersistenceError> {
    match sheet {
        Some(name) => sheet_names
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string())),
        None => sheet_names.into_iter().next().ok_or_else(|| {
            PersistenceError::InvalidFormat("Workbook contains no sheets".to_string())
        }),
    }
}

fn convert_cell(cell: &Data, field: &FieldDef, row: usize) -> Result<Value, PersistenceError> {
    let number = match cell {
        Data::Empty | Data::Error(_) => return Ok(Value::Missing),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            return parse_text(s, field, row)
        }
        Data::Bool(b) => {
            return match field.value_type {
                ValueType::Text => Ok(Value::text(b.to_string())),
                _ => Err(invalid(&b.to_string(), field, row)),
            }
        }
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::DateTime(dt) => dt.as_f64(),
    };

    if number.is_nan() {
        return Ok(Value::Missing);
    }

    match field.value_type {
        ValueType::Number => Ok(Value::Number(number)),
        // Codes such as CEP or CNPJ are often stored as numbers.
        ValueType::Text => Ok(Value::text(Value::Number(number).display_value())),
        ValueType::Date => excel_serial_to_date(number)
            .map(Value::Date)
            .ok_or_else(|| invalid(&number.to_string(), field, row)),
    }
}
