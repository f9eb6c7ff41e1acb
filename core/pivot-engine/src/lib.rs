//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot subsystem for the fuel sales dashboard.
//!
//! This crate provides the aggregation engine as a standalone module. It
//! depends on `dataset` only for the record model (Value, Schema, RecordSet)
//! and never loads or mutates data itself.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot IS)
//! - `aggregation`: Named reducers (HOW a cell is aggregated)
//! - `cache`: Interned axis values (HOW we group)
//! - `view`: Dense output tables and rankings (WHAT we return)
//! - `engine`: Calculation engine (HOW we calculate)

pub mod aggregation;
pub mod cache;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use aggregation::{AggregatorRegistry, Reducer};
pub use cache::{AxisValue, OrderedFloat};
pub use definition::{aggregations, EmptyCell, PivotSpec};
pub use engine::{drill_down, group_reduce, pivot, top_n, PivotCalculator, PivotEngine};
pub use error::PivotError;
pub use view::{PivotTable, RankedItem, Ranking};
