//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, SavedCellValue, Workbook};
use log::info;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use std::path::Path;

/// Number format applied to non-integral values.
const DECIMAL_FORMAT: &str = "#,##0.00";

pub fn save_xlsx(workbook: &Workbook, path: &Path) -> Result<(), PersistenceError> {
    if workbook.sheets.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let decimal_format = Format::new().set_num_format(DECIMAL_FORMAT);

    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &header_format)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let xl_row = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let xl_col = c as u16;
                match cell {
                    SavedCellValue::Empty => {}
                    SavedCellValue::Number(n) if n.fract() != 0.0 => {
                        worksheet.write_number_with_format(xl_row, xl_col, *n, &decimal_format)?;
                    }
                    SavedCellValue::Number(n) => {
                        worksheet.write_number(xl_row, xl_col, *n)?;
                    }
                    SavedCellValue::Text(s) => {
                        worksheet.write_string(xl_row, xl_col, s)?;
                    }
                }
            }
        }

        worksheet.autofit();
    }

    xlsx.save(path)?;

    info!(
        target: "EXPORT",
        "saved {} sheets to {}",
        workbook.sheets.len(),
        path.display()
    );
    Ok(())
}
