//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The configuration of a single pivot computation.
//!
//! These structures DESCRIBE a pivot: which field goes on each axis, which
//! measure is aggregated and with which function. They are:
//! - Serializable (analyses can be stored or sent as JSON)
//! - Plain values built by the caller, never read from the environment
//! - Validated against a schema only when the pivot is computed

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION NAMES
// ============================================================================

/// Names of the reducers registered by `AggregatorRegistry::builtin()`.
pub mod aggregations {
    pub const SUM: &str = "sum";
    pub const MEAN: &str = "mean";
    pub const COUNT: &str = "count";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MEDIAN: &str = "median";
    pub const PRODUCT: &str = "product";
    pub const VAR: &str = "var";
    pub const STDDEV: &str = "stddev";
}

// ============================================================================
// EMPTY CELL POLICY
// ============================================================================

/// What a cell holds when no measure value contributes to it.
///
/// `Fill(0.0)` keeps the table dense and free of nulls, but it makes an
/// empty `mean` cell indistinguishable from a real average of zero. `NaN`
/// leaves such cells undefined; the contributing count of every cell is
/// available on the table either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EmptyCell {
    Fill(f64),
    NaN,
}

impl EmptyCell {
    pub fn value(&self) -> f64 {
        match self {
            EmptyCell::Fill(v) => *v,
            EmptyCell::NaN => f64::NAN,
        }
    }
}

impl Default for EmptyCell {
    fn default() -> Self {
        EmptyCell::Fill(0.0)
    }
}

// ============================================================================
// PIVOT SPECIFICATION
// ============================================================================

/// The complete description of one pivot computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotSpec {
    /// Field whose distinct values become the row keys.
    pub row_dimension: String,

    /// Field whose distinct values become the column keys.
    /// When absent the table has a single column named after the measure.
    #[serde(default)]
    pub column_dimension: Option<String>,

    /// Numeric field being aggregated.
    pub measure: String,

    /// Registered reducer name (e.g. "sum", "mean").
    pub aggregation: String,

    /// Value used for cells without contributing records.
    #[serde(default)]
    pub empty_cell: EmptyCell,
}

impl PivotSpec {
    /// Creates a one-dimensional specification (no column dimension).
    pub fn new(
        row_dimension: impl Into<String>,
        measure: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> Self {
        PivotSpec {
            row_dimension: row_dimension.into(),
            column_dimension: None,
            measure: measure.into(),
            aggregation: aggregation.into(),
            empty_cell: EmptyCell::default(),
        }
    }

    /// Creates a cross-tabulation of `row_dimension` by `column_dimension`.
    pub fn cross(
        row_dimension: impl Into<String>,
        column_dimension: impl Into<String>,
        measure: impl Into<String>,
        aggregation: impl Into<String>,
    ) -> Self {
        PivotSpec {
            column_dimension: Some(column_dimension.into()),
            ..Self::new(row_dimension, measure, aggregation)
        }
    }

    pub fn with_empty_cell(mut self, empty_cell: EmptyCell) -> Self {
        self.empty_cell = empty_cell;
        self
    }

    /// Every field name this specification refers to.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.row_dimension.as_str()];
        if let Some(column) = &self.column_dimension {
            fields.push(column);
        }
        fields.push(&self.measure);
        fields
    }
}
