//! FILENAME: core/dataset/src/value.rs
//! PURPOSE: Defines the scalar values a record field can hold.
//! CONTEXT: The warehouse export only carries three kinds of data (numbers,
//! text and calendar dates) plus the null marker. Millions of these may be
//! loaded at once, so the enum stays small and cheap to clone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of value a field is declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Number,
    Text,
    Date,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Number => "number",
            ValueType::Text => "text",
            ValueType::Date => "date",
        };
        f.write_str(name)
    }
}

/// A single field value within a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// True for the null marker. A NaN number is treated as missing too,
    /// since that is how numeric nulls arrive from most exports.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Returns the kind of this value, or None when missing.
    pub fn value_type(&self) -> Option<ValueType> {
        if self.is_missing() {
            return None;
        }
        match self {
            Value::Missing => None,
            Value::Number(_) => Some(ValueType::Number),
            Value::Text(_) => Some(ValueType::Text),
            Value::Date(_) => Some(ValueType::Date),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Returns the display value as a String.
    /// Whole numbers are printed without a decimal part.
    pub fn display_value(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Number(n) if n.is_nan() => String::new(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Missing
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_missing() {
        assert!(Value::Number(f64::NAN).is_missing());
        assert_eq!(Value::Number(f64::NAN).value_type(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(Value::Number(2020.0).display_value(), "2020");
        assert_eq!(Value::Number(1.5).display_value(), "1.5");
        assert_eq!(Value::text("Diesel").display_value(), "Diesel");
        assert_eq!(Value::Missing.display_value(), "");

        let date = NaiveDate::from_ymd_opt(2023, 4, 9).unwrap();
        assert_eq!(Value::Date(date).display_value(), "2023-04-09");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<f64>), Value::Missing);
        assert_eq!(Value::from(Some("SP")), Value::text("SP"));
    }
}
