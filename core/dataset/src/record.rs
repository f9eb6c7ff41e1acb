//! FILENAME: core/dataset/src/record.rs
//! PURPOSE: Records and the ordered collection that owns them.
//! CONTEXT: A `RecordSet` is the materialized output of the data source.
//! Consumers borrow it read-only; the derivation helpers below build new
//! sets instead of editing rows in place.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::{FieldIndex, Schema};
use crate::value::Value;

static MISSING: Value = Value::Missing;

/// One row of source data, aligned with its schema's field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at a field index. Out-of-range indices read as missing.
    pub fn get(&self, index: FieldIndex) -> &Value {
        self.values.get(index).unwrap_or(&MISSING)
    }
}

/// Ordered sequence of records sharing one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    schema: Schema,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(schema: Schema) -> Self {
        RecordSet {
            schema,
            records: Vec::new(),
        }
    }

    pub fn with_capacity(schema: Schema, capacity: usize) -> Self {
        RecordSet {
            schema,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Builds a set from rows, checking each one against the schema.
    pub fn from_rows<I>(schema: Schema, rows: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let mut set = RecordSet::new(schema);
        for row in rows {
            set.push(row)?;
        }
        Ok(set)
    }

    /// Appends a row after checking its arity and value kinds.
    pub fn push(&mut self, values: Vec<Value>) -> Result<(), SchemaError> {
        if values.len() != self.schema.len() {
            return Err(SchemaError::ArityMismatch {
                expected: self.schema.len(),
                found: values.len(),
            });
        }

        for (value, field) in values.iter().zip(self.schema.fields()) {
            if let Some(found) = value.value_type() {
                if found != field.value_type {
                    return Err(SchemaError::TypeMismatch {
                        field: field.name.clone(),
                        expected: field.value_type,
                        found,
                    });
                }
            }
        }

        self.records.push(Record { values });
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the values of one named field, in record order.
    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = &'a Value> + 'a, SchemaError> {
        let (index, _) = self.schema.field(name)?;
        Ok(self.records.iter().map(move |r| r.get(index)))
    }

    /// Returns a copy where missing values of `field` are replaced by `fill`.
    pub fn fill_missing(&self, field: &str, fill: Value) -> Result<RecordSet, SchemaError> {
        let (index, def) = self.schema.field(field)?;
        if let Some(found) = fill.value_type() {
            if found != def.value_type {
                return Err(SchemaError::TypeMismatch {
                    field: def.name.clone(),
                    expected: def.value_type,
                    found,
                });
            }
        }

        let records = self
            .records
            .iter()
            .map(|record| {
                let mut values = record.values.clone();
                if values[index].is_missing() {
                    values[index] = fill.clone();
                }
                Record { values }
            })
            .collect();

        Ok(RecordSet {
            schema: self.schema.clone(),
            records,
        })
    }

    /// Returns a copy without the records missing any of `fields`.
    pub fn drop_missing(&self, fields: &[&str]) -> Result<RecordSet, SchemaError> {
        let indices = fields
            .iter()
            .map(|name| self.schema.field(name).map(|(i, _)| i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.filtered(|record| indices.iter().all(|&i| !record.get(i).is_missing())))
    }

    /// Returns a copy keeping only records whose `field` value is in `allowed`.
    pub fn retain(&self, field: &str, allowed: &[Value]) -> Result<RecordSet, SchemaError> {
        let (index, _) = self.schema.field(field)?;
        Ok(self.filtered(|record| allowed.contains(record.get(index))))
    }

    fn filtered<F>(&self, keep: F) -> RecordSet
    where
        F: Fn(&Record) -> bool,
    {
        RecordSet {
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
