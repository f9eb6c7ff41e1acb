//! FILENAME: core/persistence/src/csv_reader.rs

use crate::parse::{map_columns, parse_text};
use crate::PersistenceError;
use csv::ReaderBuilder;
use dataset::{RecordSet, Schema};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn load_csv(path: &Path, schema: &Schema) -> Result<RecordSet, PersistenceError> {
    let file = File::open(path)?;
    let records = read_csv(file, schema)?;

    info!(
        target: "LOAD",
        "loaded {} records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Header names of a CSV file.
pub fn csv_headers(path: &Path) -> Result<Vec<String>, PersistenceError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    Ok(rdr.headers()?.iter().map(str::to_string).collect())
}

/// Reads CSV text with a header row into records of `schema`.
pub fn read_csv<R: Read>(reader: R, schema: &Schema) -> Result<RecordSet, PersistenceError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let columns = map_columns(schema, &headers)?;

    let mut records = RecordSet::new(schema.clone());
    for (index, row) in rdr.records().enumerate() {
        let row = row?;
        // Quoted fields may span lines, so ask the reader where the row began.
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);

        let values = schema
            .fields()
            .iter()
            .zip(&columns)
            .map(|(field, &col)| parse_text(row.get(col).unwrap_or(""), field, line))
            .collect::<Result<Vec<_>, _>>()?;

        records.push(values)?;
    }

    Ok(records)
}
