//! FILENAME: app/cli/src/lib.rs
//! Fuel sales and ICMS OLAP dashboard.
//!
//! Loads a warehouse export, runs one of the predefined analyses on the
//! pivot engine and renders or exports the resulting report.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod report;
pub mod warehouse;

use std::path::Path;

use dataset::RecordSet;
use pivot_engine::PivotEngine;

pub use analysis::{Analysis, AnalysisOptions};
pub use config::{DashboardConfig, EmptyCellMode};
pub use error::DashboardError;
pub use report::{Report, ReportSection, SectionBody};

/// Loads the configured data file with the warehouse fields it contains.
pub fn load_warehouse(config: &DashboardConfig) -> Result<RecordSet, DashboardError> {
    let path = config.data_path()?;
    let sheet = config.sheet.as_deref();

    let headers = persistence::read_headers(path, sheet)?;
    let schema = warehouse::schema_for_columns(&headers)?;
    log_debug!(
        "LOAD",
        "{} of {} columns match the warehouse layout",
        schema.len(),
        headers.len()
    );

    Ok(persistence::load_records(path, sheet, &schema)?)
}

/// Runs `analysis` over `records` with the builtin aggregation functions.
pub fn run_analysis(
    analysis: Analysis,
    records: &RecordSet,
    config: &DashboardConfig,
) -> Result<Report, DashboardError> {
    let engine = PivotEngine::default();
    analysis.run(&engine, records, &AnalysisOptions::from(config))
}

/// Writes the report as XLSX (one sheet per section) or JSON, by extension.
pub fn export_report(report: &Report, path: &Path) -> Result<(), DashboardError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx") => persistence::save_xlsx(&report.to_workbook(), path)?,
        Some("json") => persistence::save_json(report, path)?,
        _ => {
            return Err(DashboardError::Config(format!(
                "export path must end in .xlsx or .json: {}",
                path.display()
            )))
        }
    }

    log_info!("EXPORT", "{} -> {}", report.analysis.id(), path.display());
    Ok(())
}
