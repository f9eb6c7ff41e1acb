//! FILENAME: core/persistence/src/lib.rs
//! Fuel Dashboard Persistence Module
//!
//! Loads warehouse exports (CSV or XLSX) into typed records and saves
//! computed reports in XLSX or JSON format.

mod csv_reader;
mod error;
mod json_writer;
mod parse;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::{csv_headers, load_csv, read_csv};
pub use error::PersistenceError;
pub use json_writer::save_json;
pub use xlsx_reader::{load_xlsx, xlsx_headers};
pub use xlsx_writer::save_xlsx;

use dataset::{RecordSet, Schema};
use pivot_engine::{AxisValue, PivotTable, Ranking};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Excel limit on worksheet name length.
pub const MAX_SHEET_NAME_LEN: usize = 31;

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx") || e.eq_ignore_ascii_case("xlsm"))
        .unwrap_or(false)
}

/// Loads records by file extension: `.xlsx`/`.xlsm` through calamine,
/// anything else as CSV. `sheet` only applies to spreadsheets.
pub fn load_records(
    path: &Path,
    sheet: Option<&str>,
    schema: &Schema,
) -> Result<RecordSet, PersistenceError> {
    if is_spreadsheet(path) {
        load_xlsx(path, sheet, schema)
    } else {
        load_csv(path, schema)
    }
}

/// Column names of a file, dispatched the same way as `load_records`.
pub fn read_headers(path: &Path, sheet: Option<&str>) -> Result<Vec<String>, PersistenceError> {
    if is_spreadsheet(path) {
        xlsx_headers(path, sheet)
    } else {
        csv_headers(path)
    }
}

// ============================================================================
// WORKBOOK
// ============================================================================

/// A set of tabular sheets ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, renaming it when the name is invalid or already taken.
    /// Names clash case-insensitively, accented letters included.
    pub fn add_sheet(&mut self, mut sheet: Sheet) {
        let base = sanitize_sheet_name(&sheet.name);
        let mut name = base.clone();
        let mut suffix = 2;
        while self.is_taken(&name) {
            let tag = format!(" ({})", suffix);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(tag.chars().count());
            name = format!("{}{}", base.chars().take(keep).collect::<String>(), tag);
            suffix += 1;
        }
        sheet.name = name;
        self.sheets.push(sheet);
    }

    fn is_taken(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        self.sheets.iter().any(|s| s.name.to_lowercase() == folded)
    }
}

// ============================================================================
// SHEET
// ============================================================================

/// A single worksheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<SavedCellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Row keys in the first column, one column per pivot column key.
    pub fn from_pivot(name: impl Into<String>, table: &PivotTable) -> Self {
        let mut header = vec![table.row_field.clone()];
        header.extend(table.column_keys.iter().map(AxisValue::label));

        let rows = table
            .rows()
            .map(|(key, cells)| {
                let mut row = vec![SavedCellValue::from_key(key)];
                row.extend(cells.iter().map(|&v| SavedCellValue::from_number(v)));
                row
            })
            .collect();

        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    /// Two columns: the ranked key and its aggregated value.
    pub fn from_ranking(name: impl Into<String>, ranking: &Ranking) -> Self {
        let header = vec![ranking.dimension.clone(), ranking.measure.clone()];
        let rows = ranking
            .items
            .iter()
            .map(|item| {
                vec![
                    SavedCellValue::from_key(&item.key),
                    SavedCellValue::from_number(item.value),
                ]
            })
            .collect();

        Self {
            name: name.into(),
            header,
            rows,
        }
    }
}

// ============================================================================
// SAVED CELL VALUE
// ============================================================================

/// Serializable cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedCellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl SavedCellValue {
    /// NaN cells are written as empty.
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            SavedCellValue::Empty
        } else {
            SavedCellValue::Number(value)
        }
    }

    pub fn from_key(key: &AxisValue) -> Self {
        match key {
            AxisValue::Number(n) => SavedCellValue::Number(n.as_f64()),
            AxisValue::Text(s) => SavedCellValue::Text(s.clone()),
            AxisValue::Date(_) => SavedCellValue::Text(key.label()),
        }
    }
}

/// Replaces characters Excel forbids in sheet names and enforces the length limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();

    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_engine::RankedItem;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("ICMS / Estado"), "ICMS _ Estado");
        assert_eq!(sanitize_sheet_name("''"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_add_sheet_deduplicates_names() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::new("Vendas", vec![]));
        workbook.add_sheet(Sheet::new("vendas", vec![]));
        workbook.add_sheet(Sheet::new("Vendas", vec![]));

        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Vendas", "vendas (2)", "Vendas (3)"]);
    }

    #[test]
    fn test_add_sheet_folds_accented_case() {
        let mut workbook = Workbook::new();
        workbook.add_sheet(Sheet::new("Produção", vec![]));
        workbook.add_sheet(Sheet::new("PRODUÇÃO", vec![]));

        assert_eq!(workbook.sheets[1].name, "PRODUÇÃO (2)");
    }

    #[test]
    fn test_sheet_from_ranking() {
        let ranking = Ranking {
            dimension: "Nome_posto".to_string(),
            measure: "Valor_venda".to_string(),
            aggregation: "mean".to_string(),
            items: vec![RankedItem { key: AxisValue::from("Posto B"), value: 30.0 }],
        };

        let sheet = Sheet::from_ranking("Ticket", &ranking);

        assert_eq!(sheet.header, vec!["Nome_posto", "Valor_venda"]);
        assert_eq!(
            sheet.rows,
            vec![vec![SavedCellValue::Text("Posto B".to_string()), SavedCellValue::Number(30.0)]]
        );
    }

    #[test]
    fn test_nan_cells_are_empty() {
        assert_eq!(SavedCellValue::from_number(f64::NAN), SavedCellValue::Empty);
        assert_eq!(
            SavedCellValue::from_key(&AxisValue::from(2021)),
            SavedCellValue::Number(2021.0)
        );
    }
}
