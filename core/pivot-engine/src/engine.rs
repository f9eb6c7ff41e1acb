//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a PivotTable.
//!
//! This module takes a PivotSpec (configuration) and a RecordSet (data)
//! and produces a dense PivotTable.
//!
//! Algorithm:
//! 1. Resolve the specification against the schema (fails before any work)
//! 2. Scan the records once, interning axis keys and bucketing measure values
//! 3. Sort both axes and remap interned ids to axis positions
//! 4. Reduce every (row, column) bucket; empty buckets take the fill value
//!
//! Missing values: a record whose row or column dimension is missing is left
//! out of the table entirely. A record whose measure is missing still
//! contributes its keys, but not a value, so it never drags a mean down.

use std::sync::OnceLock;

use dataset::{FieldIndex, RecordSet};
use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::aggregation::{AggregatorRegistry, Reducer};
use crate::cache::{AxisIndex, AxisValue, FieldCache, ValueId};
use crate::definition::{EmptyCell, PivotSpec};
use crate::error::PivotError;
use crate::view::{PivotTable, RankedItem, Ranking};

/// Measure values that fall into one cell, in record order.
type Bucket = SmallVec<[f64; 4]>;

/// (row id, column id) as interned during the scan.
type CellKey = (ValueId, ValueId);

/// Column id used when the specification has no column dimension.
const IMPLICIT_COLUMN: ValueId = 0;

// ============================================================================
// SPEC RESOLUTION
// ============================================================================

/// Field indices and reducer a specification resolves to.
struct ResolvedSpec<'r> {
    row: FieldIndex,
    column: Option<FieldIndex>,
    measure: FieldIndex,
    reducer: &'r dyn Reducer,
}

fn resolve<'r>(
    records: &RecordSet,
    spec: &PivotSpec,
    registry: &'r AggregatorRegistry,
) -> Result<ResolvedSpec<'r>, PivotError> {
    let schema = records.schema();

    let (row, _) = schema.field(&spec.row_dimension)?;
    let column = match &spec.column_dimension {
        Some(name) => Some(schema.field(name)?.0),
        None => None,
    };
    let measure = schema.numeric_field(&spec.measure)?;
    let reducer = lookup_reducer(registry, &spec.aggregation)?;

    Ok(ResolvedSpec {
        row,
        column,
        measure,
        reducer,
    })
}

fn lookup_reducer<'r>(
    registry: &'r AggregatorRegistry,
    name: &str,
) -> Result<&'r dyn Reducer, PivotError> {
    registry
        .get(name)
        .ok_or_else(|| PivotError::UnknownAggregation(name.to_string()))
}

// ============================================================================
// GROUPING
// ============================================================================

/// Measure values grouped by cell, with both axes sorted.
struct GroupedCells {
    rows: AxisIndex,
    columns: AxisIndex,
    buckets: FxHashMap<CellKey, Bucket>,
}

impl GroupedCells {
    /// Single pass over the records.
    fn scan(
        records: &RecordSet,
        row: FieldIndex,
        column: Option<FieldIndex>,
        measure: FieldIndex,
        implicit_column: AxisValue,
    ) -> Self {
        let mut row_cache = FieldCache::new();
        let mut col_cache = FieldCache::new();
        let mut buckets: FxHashMap<CellKey, Bucket> = FxHashMap::default();

        for record in records {
            let Some(row_value) = AxisValue::from_value(record.get(row)) else {
                continue;
            };

            let col_id = match column {
                Some(col) => match AxisValue::from_value(record.get(col)) {
                    Some(col_value) => col_cache.intern(col_value),
                    None => continue,
                },
                None => IMPLICIT_COLUMN,
            };

            let row_id = row_cache.intern(row_value);
            let bucket = buckets.entry((row_id, col_id)).or_default();
            if let Some(value) = record.get(measure).as_number() {
                bucket.push(value);
            }
        }

        let columns = match column {
            Some(_) => col_cache.into_axis(),
            None => AxisIndex::single(implicit_column),
        };

        GroupedCells {
            rows: row_cache.into_axis(),
            columns,
            buckets,
        }
    }

    /// Reduces every bucket with `reducer`, filling the cells no bucket reaches.
    fn reduce(&self, reducer: &dyn Reducer, fill: f64) -> (Vec<f64>, Vec<usize>) {
        let width = self.columns.len();
        let size = self.rows.len() * width;
        let mut cells = vec![fill; size];
        let mut counts = vec![0usize; size];

        for (&(row_id, col_id), bucket) in &self.buckets {
            let index = self.rows.position(row_id) * width + self.columns.position(col_id);
            counts[index] = bucket.len();
            if !bucket.is_empty() {
                cells[index] = reducer.reduce(bucket).unwrap_or(fill);
            }
        }

        (cells, counts)
    }
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Computes one pivot. Construction validates the specification, so a
/// calculator that exists can always produce a table.
pub struct PivotCalculator<'a> {
    records: &'a RecordSet,
    spec: &'a PivotSpec,
    resolved: ResolvedSpec<'a>,
}

impl<'a> PivotCalculator<'a> {
    pub fn new(
        records: &'a RecordSet,
        spec: &'a PivotSpec,
        registry: &'a AggregatorRegistry,
    ) -> Result<Self, PivotError> {
        let resolved = resolve(records, spec, registry)?;
        Ok(PivotCalculator {
            records,
            spec,
            resolved,
        })
    }

    /// Executes the full calculation and returns the table.
    pub fn calculate(&self) -> PivotTable {
        let grouped = GroupedCells::scan(
            self.records,
            self.resolved.row,
            self.resolved.column,
            self.resolved.measure,
            AxisValue::text(self.spec.measure.as_str()),
        );

        let (cells, counts) = grouped.reduce(self.resolved.reducer, self.spec.empty_cell.value());

        debug!(
            target: "PIVOT",
            "pivot row={} column={:?} measure={} aggregation={} records={} -> {}x{}",
            self.spec.row_dimension,
            self.spec.column_dimension,
            self.spec.measure,
            self.spec.aggregation,
            self.records.len(),
            grouped.rows.len(),
            grouped.columns.len()
        );

        PivotTable::from_parts(
            self.spec.row_dimension.clone(),
            self.spec.column_dimension.clone(),
            self.spec.measure.clone(),
            self.spec.aggregation.clone(),
            grouped.rows.keys,
            grouped.columns.keys,
            cells,
            counts,
        )
    }

    /// Indices of the records feeding the cell at (`row_key`, `column_key`).
    /// With a column dimension and no `column_key`, the whole row matches.
    pub fn drill_down(&self, row_key: &AxisValue, column_key: Option<&AxisValue>) -> Vec<usize> {
        let measure = self.resolved.measure;
        let row = self.resolved.row;

        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                if !row_key.matches(record.get(row)) {
                    return false;
                }
                if let Some(col) = self.resolved.column {
                    let col_value = record.get(col);
                    let column_ok = match column_key {
                        Some(key) => key.matches(col_value),
                        None => !col_value.is_missing(),
                    };
                    if !column_ok {
                        return false;
                    }
                }
                record.get(measure).as_number().is_some()
            })
            .map(|(index, _)| index)
            .collect()
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// A pivot engine bound to a set of aggregation functions.
#[derive(Debug, Clone)]
pub struct PivotEngine {
    registry: AggregatorRegistry,
}

impl Default for PivotEngine {
    fn default() -> Self {
        PivotEngine::new(AggregatorRegistry::builtin())
    }
}

impl PivotEngine {
    pub fn new(registry: AggregatorRegistry) -> Self {
        PivotEngine { registry }
    }

    /// Makes a new aggregation function available to every specification.
    pub fn register<R>(&mut self, name: impl Into<String>, reducer: R)
    where
        R: Reducer + 'static,
    {
        self.registry.register(name, reducer);
    }

    /// Computes the dense pivot of `records` described by `spec`.
    pub fn pivot(&self, records: &RecordSet, spec: &PivotSpec) -> Result<PivotTable, PivotError> {
        PivotCalculator::new(records, spec, &self.registry).map(|calc| calc.calculate())
    }

    /// One-dimensional group-and-reduce, in ascending key order.
    pub fn group_reduce(
        &self,
        records: &RecordSet,
        dimension: &str,
        measure: &str,
        aggregation: &str,
    ) -> Result<Vec<(AxisValue, f64)>, PivotError> {
        let spec = PivotSpec::new(dimension, measure, aggregation);
        let table = self.pivot(records, &spec)?;
        Ok(table
            .rows()
            .map(|(key, cells)| (key.clone(), cells[0]))
            .collect())
    }

    /// Groups by `dimension`, reduces `measure`, and keeps the `n` largest
    /// values in descending order. Ties keep ascending key order.
    pub fn top_n(
        &self,
        records: &RecordSet,
        dimension: &str,
        measure: &str,
        aggregation: &str,
        n: usize,
    ) -> Result<Ranking, PivotError> {
        let mut items: Vec<RankedItem> = self
            .group_reduce(records, dimension, measure, aggregation)?
            .into_iter()
            .map(|(key, value)| RankedItem { key, value })
            .collect();

        items.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.key.cmp(&b.key))
        });
        items.truncate(n);

        Ok(Ranking {
            dimension: dimension.to_string(),
            measure: measure.to_string(),
            aggregation: aggregation.to_string(),
            items,
        })
    }

    /// Applies several aggregations to the same grouping. The columns of the
    /// result are the aggregation names, in the order given.
    pub fn summarize(
        &self,
        records: &RecordSet,
        dimension: &str,
        measure: &str,
        aggregations: &[&str],
        empty_cell: EmptyCell,
    ) -> Result<PivotTable, PivotError> {
        let schema = records.schema();
        let (row, _) = schema.field(dimension)?;
        let measure_index = schema.numeric_field(measure)?;
        let reducers = aggregations
            .iter()
            .map(|name| lookup_reducer(&self.registry, name))
            .collect::<Result<Vec<_>, _>>()?;

        let grouped = GroupedCells::scan(
            records,
            row,
            None,
            measure_index,
            AxisValue::text(measure),
        );

        let row_count = grouped.rows.len();
        let width = reducers.len();
        let mut cells = vec![0.0; row_count * width];
        let mut counts = vec![0usize; row_count * width];

        for (col, reducer) in reducers.iter().enumerate() {
            let (column_cells, column_counts) = grouped.reduce(*reducer, empty_cell.value());
            for r in 0..row_count {
                cells[r * width + col] = column_cells[r];
                counts[r * width + col] = column_counts[r];
            }
        }

        debug!(
            target: "PIVOT",
            "summarize dimension={} measure={} aggregations={:?} -> {} rows",
            dimension,
            measure,
            aggregations,
            row_count
        );

        Ok(PivotTable::from_parts(
            dimension.to_string(),
            None,
            measure.to_string(),
            aggregations.join(","),
            grouped.rows.keys,
            aggregations.iter().map(|name| AxisValue::text(*name)).collect(),
            cells,
            counts,
        ))
    }

    /// Source record indices behind one cell of the pivot described by `spec`.
    pub fn drill_down(
        &self,
        records: &RecordSet,
        spec: &PivotSpec,
        row_key: &AxisValue,
        column_key: Option<&AxisValue>,
    ) -> Result<Vec<usize>, PivotError> {
        let calculator = PivotCalculator::new(records, spec, &self.registry)?;
        Ok(calculator.drill_down(row_key, column_key))
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

fn builtin_engine() -> &'static PivotEngine {
    static ENGINE: OnceLock<PivotEngine> = OnceLock::new();
    ENGINE.get_or_init(PivotEngine::default)
}

/// Computes a pivot with the builtin aggregation functions.
/// This is the main entry point for the calculation engine.
pub fn pivot(records: &RecordSet, spec: &PivotSpec) -> Result<PivotTable, PivotError> {
    builtin_engine().pivot(records, spec)
}

/// One-dimensional group-and-reduce with the builtin aggregation functions.
pub fn group_reduce(
    records: &RecordSet,
    dimension: &str,
    measure: &str,
    aggregation: &str,
) -> Result<Vec<(AxisValue, f64)>, PivotError> {
    builtin_engine().group_reduce(records, dimension, measure, aggregation)
}

/// Top-N ranking with the builtin aggregation functions.
pub fn top_n(
    records: &RecordSet,
    dimension: &str,
    measure: &str,
    aggregation: &str,
    n: usize,
) -> Result<Ranking, PivotError> {
    builtin_engine().top_n(records, dimension, measure, aggregation, n)
}

/// Performs a drill-down to the source records of a cell.
pub fn drill_down(
    records: &RecordSet,
    spec: &PivotSpec,
    row_key: &AxisValue,
    column_key: Option<&AxisValue>,
) -> Result<Vec<usize>, PivotError> {
    builtin_engine().drill_down(records, spec, row_key, column_key)
}
