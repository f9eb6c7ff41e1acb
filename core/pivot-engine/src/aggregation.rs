//! FILENAME: core/pivot-engine/src/aggregation.rs
//! Aggregation functions as a named capability.
//!
//! A reducer turns the multiset of measure values that fall into one cell
//! into a single number. The engine never branches on the aggregation kind:
//! it looks the reducer up by name, so new functions are registered here (or
//! by the caller) without touching the pivot algorithm.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::definition::aggregations;

// ============================================================================
// REDUCER
// ============================================================================

/// A reduction over the measure values of one cell.
///
/// `values` is never empty when called by the engine. Returning `None`
/// means the reduction is undefined for this input (e.g. the sample
/// variance of a single value); the engine then applies the fill policy.
pub trait Reducer: Send + Sync {
    fn reduce(&self, values: &[f64]) -> Option<f64>;
}

impl<F> Reducer for F
where
    F: Fn(&[f64]) -> Option<f64> + Send + Sync,
{
    fn reduce(&self, values: &[f64]) -> Option<f64> {
        self(values)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Mapping from aggregation name to reducer.
#[derive(Clone, Default)]
pub struct AggregatorRegistry {
    reducers: FxHashMap<String, Arc<dyn Reducer>>,
}

impl AggregatorRegistry {
    /// Creates a registry with no reducers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the standard reducers.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(aggregations::SUM, sum);
        registry.register(aggregations::MEAN, mean);
        registry.register(aggregations::COUNT, count);
        registry.register(aggregations::MIN, min);
        registry.register(aggregations::MAX, max);
        registry.register(aggregations::MEDIAN, median);
        registry.register(aggregations::PRODUCT, product);
        registry.register(aggregations::VAR, sample_variance);
        registry.register(aggregations::STDDEV, sample_stddev);
        registry
    }

    /// Registers (or replaces) a reducer under `name`.
    pub fn register<R>(&mut self, name: impl Into<String>, reducer: R)
    where
        R: Reducer + 'static,
    {
        self.reducers.insert(name.into(), Arc::new(reducer));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Reducer> {
        self.reducers.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.reducers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for AggregatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorRegistry")
            .field("reducers", &self.names())
            .finish()
    }
}

// ============================================================================
// BUILTIN REDUCERS
// ============================================================================

pub fn sum(values: &[f64]) -> Option<f64> {
    Some(values.iter().sum())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn count(values: &[f64]) -> Option<f64> {
    Some(values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn product(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().product())
}

/// Sample variance (n - 1 denominator), computed with Welford's algorithm.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &value) in values.iter().enumerate() {
        let delta = value - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (value - mean);
    }
    Some(m2 / (values.len() - 1) as f64)
}

pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}
