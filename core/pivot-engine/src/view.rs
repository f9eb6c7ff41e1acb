//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - The engine's output values.
//!
//! A `PivotTable` is dense: every (row key, column key) pair has a number,
//! stored row-major. Alongside each cell the table keeps how many measure
//! values contributed to it, so consumers can tell "no data" apart from a
//! real zero without the table carrying nulls.

use serde::{Deserialize, Serialize};

use crate::cache::AxisValue;

// ============================================================================
// PIVOT TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Field whose values label the rows.
    pub row_field: String,

    /// Field whose values label the columns (None for one-dimensional tables).
    pub column_field: Option<String>,

    /// Aggregated measure.
    pub measure: String,

    /// Reducer name used for the cells.
    pub aggregation: String,

    /// Sorted row keys.
    pub row_keys: Vec<AxisValue>,

    /// Column keys: sorted field values, the measure name when there is no
    /// column field, or aggregation names in caller order for summaries.
    pub column_keys: Vec<AxisValue>,

    /// Row-major cell values (row_keys.len() * column_keys.len()).
    /// NaN cells serialize as null.
    #[serde(with = "nan_as_null")]
    cells: Vec<f64>,

    /// Row-major contributing value counts.
    counts: Vec<usize>,
}

impl PivotTable {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        row_field: String,
        column_field: Option<String>,
        measure: String,
        aggregation: String,
        row_keys: Vec<AxisValue>,
        column_keys: Vec<AxisValue>,
        cells: Vec<f64>,
        counts: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(cells.len(), row_keys.len() * column_keys.len());
        debug_assert_eq!(counts.len(), cells.len());
        PivotTable {
            row_field,
            column_field,
            measure,
            aggregation,
            row_keys,
            column_keys,
            cells,
            counts,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_keys.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    /// Cell value by position. Panics when out of range.
    pub fn cell(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.column_count() + col]
    }

    /// Number of measure values that contributed to a cell.
    pub fn count(&self, row: usize, col: usize) -> usize {
        self.counts[row * self.column_count() + col]
    }

    /// Cell value by key.
    pub fn get(&self, row_key: &AxisValue, col_key: &AxisValue) -> Option<f64> {
        let row = self.row_index(row_key)?;
        let col = self.column_index(col_key)?;
        Some(self.cell(row, col))
    }

    pub fn row_index(&self, key: &AxisValue) -> Option<usize> {
        self.row_keys.binary_search(key).ok()
    }

    pub fn column_index(&self, key: &AxisValue) -> Option<usize> {
        self.column_keys.iter().position(|k| k == key)
    }

    /// Cell values of one row.
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.column_count();
        &self.cells[row * width..(row + 1) * width]
    }

    /// Iterates rows as (key, cells) pairs in key order.
    pub fn rows(&self) -> impl Iterator<Item = (&AxisValue, &[f64])> {
        self.row_keys
            .iter()
            .enumerate()
            .map(move |(i, key)| (key, self.row(i)))
    }

    /// Sum of each row's cells. Totals skip NaN cells.
    pub fn row_totals(&self) -> Vec<f64> {
        (0..self.row_count())
            .map(|r| present_sum(self.row(r).iter().copied()))
            .collect()
    }

    /// Sum of each column's cells.
    pub fn column_totals(&self) -> Vec<f64> {
        (0..self.column_count())
            .map(|c| present_sum((0..self.row_count()).map(|r| self.cell(r, c))))
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        present_sum(self.cells.iter().copied())
    }

    /// Each cell as a percentage of its row total.
    /// Rows whose total is zero yield zero.
    pub fn percent_of_row_total(&self) -> PivotTable {
        let totals = self.row_totals();
        self.map_cells(|r, _, value| {
            let total = totals[r];
            if total != 0.0 {
                value / total * 100.0
            } else {
                0.0
            }
        })
    }

    /// Rounds every cell to `decimals` places.
    pub fn round(&self, decimals: u32) -> PivotTable {
        let factor = 10f64.powi(decimals as i32);
        self.map_cells(|_, _, value| (value * factor).round() / factor)
    }

    /// Keeps only the listed columns (in the table's own order).
    pub fn retain_columns(&self, keys: &[AxisValue]) -> PivotTable {
        let kept: Vec<usize> = (0..self.column_count())
            .filter(|&c| keys.contains(&self.column_keys[c]))
            .collect();

        let mut cells = Vec::with_capacity(self.row_count() * kept.len());
        let mut counts = Vec::with_capacity(cells.capacity());
        for r in 0..self.row_count() {
            for &c in &kept {
                cells.push(self.cell(r, c));
                counts.push(self.count(r, c));
            }
        }

        PivotTable {
            column_keys: kept.iter().map(|&c| self.column_keys[c].clone()).collect(),
            cells,
            counts,
            ..self.clone()
        }
    }

    fn map_cells<F>(&self, f: F) -> PivotTable
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let width = self.column_count().max(1);
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, &value)| f(i / width, i % width, value))
            .collect();

        PivotTable {
            cells,
            ..self.clone()
        }
    }
}

fn present_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).sum()
}

/// JSON has no NaN: empty cells are written as null and read back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub trait NanAsNull: Sized {
        fn to_nullable<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
        fn from_nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>;
    }

    fn nullable(value: f64) -> Option<f64> {
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    impl NanAsNull for f64 {
        fn to_nullable<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            nullable(*self).serialize(serializer)
        }

        fn from_nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
        }
    }

    impl NanAsNull for Vec<f64> {
        fn to_nullable<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter().map(|v| nullable(*v)))
        }

        fn from_nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let cells = Vec::<Option<f64>>::deserialize(deserializer)?;
            Ok(cells.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        }
    }

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: NanAsNull,
        S: Serializer,
    {
        value.to_nullable(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: NanAsNull,
        D: Deserializer<'de>,
    {
        T::from_nullable(deserializer)
    }
}

// ============================================================================
// RANKING
// ============================================================================

/// One entry of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub key: AxisValue,
    #[serde(with = "nan_as_null")]
    pub value: f64,
}

/// Dimension values ordered by their aggregated measure, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub dimension: String,
    pub measure: String,
    pub aggregation: String,
    pub items: Vec<RankedItem>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> Vec<AxisValue> {
        self.items.iter().map(|item| item.key.clone()).collect()
    }

    /// The ranking as (key, value) pairs.
    pub fn pairs(&self) -> Vec<(AxisValue, f64)> {
        self.items
            .iter()
            .map(|item| (item.key.clone(), item.value))
            .collect()
    }

    /// Returns the first `n` entries.
    pub fn truncated(&self, n: usize) -> Ranking {
        Ranking {
            items: self.items.iter().take(n).cloned().collect(),
            ..self.clone()
        }
    }
}
