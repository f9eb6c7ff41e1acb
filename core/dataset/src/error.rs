//! FILENAME: core/dataset/src/error.rs

use crate::value::ValueType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("field '{field}' not found in schema (available: {})", .available.join(", "))]
    MissingField { field: String, available: Vec<String> },

    #[error("field '{field}' is not numeric")]
    NotNumeric { field: String },

    #[error("record has {found} values but the schema has {expected} fields")]
    ArityMismatch { expected: usize, found: usize },

    #[error("field '{field}' expects a {expected} value, got {found}")]
    TypeMismatch {
        field: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("duplicate field name: {0}")]
    DuplicateField(String),
}
