//! FILENAME: app/cli/src/error.rs

use dataset::SchemaError;
use persistence::PersistenceError;
use pivot_engine::PivotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Pivot(#[from] PivotError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Columns missing for analysis '{analysis}': {}", .missing.join(", "))]
    MissingColumns {
        analysis: String,
        missing: Vec<String>,
    },

    #[error("Unknown analysis '{0}' (run `fuel-olap list` to see the available ones)")]
    UnknownAnalysis(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
