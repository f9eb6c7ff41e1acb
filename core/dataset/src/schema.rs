//! FILENAME: core/dataset/src/schema.rs
//! PURPOSE: Field declarations shared by every record of a collection.
//! CONTEXT: Field names and value kinds are checked when records are built,
//! so consumers can resolve a name to an index once and index rows directly.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::ValueType;

/// Index of a field within its schema (0-based).
pub type FieldIndex = usize;

/// Semantic category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldRole {
    /// Categorical or temporal grouping field (year, region, brand...).
    Dimension,
    /// Numeric field to be aggregated.
    Measure,
    /// Opaque key, not used directly in aggregation.
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub role: FieldRole,
    pub value_type: ValueType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, role: FieldRole, value_type: ValueType) -> Self {
        FieldDef {
            name: name.into(),
            role,
            value_type,
        }
    }

    pub fn dimension(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, FieldRole::Dimension, value_type)
    }

    pub fn measure(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::Measure, ValueType::Number)
    }

    pub fn identifier(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, FieldRole::Identifier, value_type)
    }
}

/// Ordered list of uniquely named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Result<Self, SchemaError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Schema { fields })
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<FieldIndex> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Resolves a field by name, failing with `SchemaError::MissingField`.
    pub fn field(&self, name: &str) -> Result<(FieldIndex, &FieldDef), SchemaError> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .ok_or_else(|| SchemaError::MissingField {
                field: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Resolves a field that must hold numbers (a measure).
    pub fn numeric_field(&self, name: &str) -> Result<FieldIndex, SchemaError> {
        let (index, def) = self.field(name)?;
        if def.value_type != ValueType::Number {
            return Err(SchemaError::NotNumeric {
                field: name.to_string(),
            });
        }
        Ok(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the requested names that are not part of this schema.
    pub fn missing<'n>(&self, names: &[&'n str]) -> Vec<&'n str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}
