//! FILENAME: core/dataset/src/lib.rs
//! Typed record model for the fuel sales fact table.
//!
//! This crate is the boundary between the data source and the pivot engine.
//! It knows nothing about where rows come from (file, warehouse, memory);
//! it only guarantees that every record matches its schema.
//!
//! Layers:
//! - `value`: Scalar values (number, text, date, missing)
//! - `schema`: Field declarations (name, role, value kind)
//! - `record`: Records and the ordered `RecordSet`

pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use error::SchemaError;
pub use record::{Record, RecordSet};
pub use schema::{FieldDef, FieldIndex, FieldRole, Schema};
pub use value::{Value, ValueType};

pub use chrono::NaiveDate;
