//! FILENAME: core/pivot-engine/src/error.rs

use dataset::SchemaError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("unknown aggregation function: {0}")]
    UnknownAggregation(String),
}
