//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Internal representation of axis values.
//!
//! The cache is designed for:
//! - A single O(n) pass over the records
//! - Memory-efficient grouping via value interning
//! - Deterministic axis order, independent of record order
//!
//! Architecture:
//! - Each distinct dimension value is stored once and referenced by id
//! - Cell buckets are keyed by (row id, column id) pairs
//! - After the scan, ids are remapped to positions in the sorted axis

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use dataset::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within a field's unique value store.
/// Using u32 to save memory (supports up to 4B unique values per field).
pub type ValueId = u32;

/// Wrapper around f64 that implements Eq, Ord and Hash for use as keys.
/// Negative zero is normalized so that 0.0 and -0.0 are the same key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    pub fn new(value: f64) -> Self {
        OrderedFloat(value + 0.0)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0 + 0.0).total_cmp(&(other.0 + 0.0))
    }
}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 + 0.0).to_bits().hash(state);
    }
}

/// A non-missing dimension value, usable as a row or column key.
///
/// Keys sort in natural ascending order: numbers numerically, text
/// lexically, dates chronologically. A field holds a single kind, but mixed
/// keys still order deterministically (numbers, then text, then dates).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisValue {
    Number(OrderedFloat),
    Text(String),
    Date(NaiveDate),
}

impl AxisValue {
    pub fn number(value: f64) -> Self {
        AxisValue::Number(OrderedFloat::new(value))
    }

    pub fn text(s: impl Into<String>) -> Self {
        AxisValue::Text(s.into())
    }

    /// Converts a record value into a key. Missing values have no key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Missing => None,
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(AxisValue::number(*n)),
            Value::Text(s) => Some(AxisValue::Text(s.clone())),
            Value::Date(d) => Some(AxisValue::Date(*d)),
        }
    }

    /// True when `value` is the record value this key was built from.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (AxisValue::Number(k), Value::Number(v)) => *k == OrderedFloat::new(*v),
            (AxisValue::Text(k), Value::Text(v)) => k == v,
            (AxisValue::Date(k), Value::Date(v)) => k == v,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            AxisValue::Number(n) => Value::Number(n.as_f64()),
            AxisValue::Text(s) => Value::Text(s.clone()),
            AxisValue::Date(d) => Value::Date(*d),
        }
    }

    /// Display label used for headers.
    pub fn label(&self) -> String {
        self.to_value().display_value()
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<&str> for AxisValue {
    fn from(s: &str) -> Self {
        AxisValue::text(s)
    }
}

impl From<f64> for AxisValue {
    fn from(n: f64) -> Self {
        AxisValue::number(n)
    }
}

impl From<i32> for AxisValue {
    fn from(n: i32) -> Self {
        AxisValue::number(f64::from(n))
    }
}

impl From<NaiveDate> for AxisValue {
    fn from(d: NaiveDate) -> Self {
        AxisValue::Date(d)
    }
}

// ============================================================================
// FIELD CACHE
// ============================================================================

/// Interning store for the distinct values of one dimension.
#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    /// Map from value to its unique ID (for deduplication during the scan).
    value_to_id: FxHashMap<AxisValue, ValueId>,

    /// Unique values in order of first appearance (indexed by ValueId).
    id_to_value: Vec<AxisValue>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: AxisValue) -> ValueId {
        if let Some(&id) = self.value_to_id.get(&value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value, id);
        id
    }

    /// Returns the number of unique values.
    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }

    /// Consumes the cache and produces the sorted axis.
    pub fn into_axis(self) -> AxisIndex {
        let mut order: Vec<ValueId> = (0..self.id_to_value.len() as ValueId).collect();
        order.sort_by(|&a, &b| self.id_to_value[a as usize].cmp(&self.id_to_value[b as usize]));

        let mut positions = vec![0usize; order.len()];
        for (position, &id) in order.iter().enumerate() {
            positions[id as usize] = position;
        }

        let mut slots: Vec<Option<AxisValue>> = self.id_to_value.into_iter().map(Some).collect();
        let keys = order
            .iter()
            .filter_map(|&id| slots[id as usize].take())
            .collect();

        AxisIndex { keys, positions }
    }
}

/// A sorted axis plus the mapping from interned ids to axis positions.
#[derive(Debug, Clone)]
pub struct AxisIndex {
    pub keys: Vec<AxisValue>,
    positions: Vec<usize>,
}

impl AxisIndex {
    /// Axis made of a single fixed key (the implicit measure column).
    pub fn single(key: AxisValue) -> Self {
        AxisIndex {
            keys: vec![key],
            positions: vec![0],
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of an interned id along the sorted axis.
    pub fn position(&self, id: ValueId) -> usize {
        self.positions[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_is_same_key() {
        assert_eq!(AxisValue::number(-0.0), AxisValue::number(0.0));

        let mut cache = FieldCache::new();
        let a = cache.intern(AxisValue::number(0.0));
        let b = cache.intern(AxisValue::Number(OrderedFloat(-0.0)));
        assert_eq!(a, b);
        assert_eq!(cache.unique_count(), 1);
    }

    #[test]
    fn test_missing_has_no_key() {
        assert_eq!(AxisValue::from_value(&Value::Missing), None);
        assert_eq!(AxisValue::from_value(&Value::Number(f64::NAN)), None);
        assert_eq!(
            AxisValue::from_value(&Value::text("SP")),
            Some(AxisValue::text("SP"))
        );
    }

    #[test]
    fn test_into_axis_sorts_and_remaps() {
        let mut cache = FieldCache::new();
        let gas = cache.intern(AxisValue::text("Gasolina"));
        let diesel = cache.intern(AxisValue::text("Diesel"));
        let etanol = cache.intern(AxisValue::text("Etanol"));
        assert_eq!(cache.intern(AxisValue::text("Diesel")), diesel);

        let axis = cache.into_axis();
        assert_eq!(
            axis.keys,
            vec![
                AxisValue::text("Diesel"),
                AxisValue::text("Etanol"),
                AxisValue::text("Gasolina"),
            ]
        );
        assert_eq!(axis.position(diesel), 0);
        assert_eq!(axis.position(etanol), 1);
        assert_eq!(axis.position(gas), 2);
    }

    #[test]
    fn test_natural_order() {
        let mut numbers = vec![
            AxisValue::number(10.0),
            AxisValue::number(2.0),
            AxisValue::number(-1.5),
        ];
        numbers.sort();
        assert_eq!(
            numbers,
            vec![AxisValue::number(-1.5), AxisValue::number(2.0), AxisValue::number(10.0)]
        );

        let early = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        let late = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let mut dates = vec![AxisValue::Date(late), AxisValue::Date(early)];
        dates.sort();
        assert_eq!(dates, vec![AxisValue::Date(early), AxisValue::Date(late)]);
    }

    #[test]
    fn test_matches_record_value() {
        assert!(AxisValue::number(2020.0).matches(&Value::Number(2020.0)));
        assert!(!AxisValue::number(2020.0).matches(&Value::text("2020")));
        assert!(!AxisValue::text("SP").matches(&Value::Missing));
    }
}
