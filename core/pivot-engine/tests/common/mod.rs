//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the pivot engine integration tests.
#![allow(dead_code)]

use dataset::{FieldDef, RecordSet, Schema, Value, ValueType};

/// A small fuel sales fact table: (year, region, fuel, station, value).
pub struct SalesFixture;

impl SalesFixture {
    pub fn schema() -> Schema {
        Schema::new(vec![
            FieldDef::dimension("Year", ValueType::Number),
            FieldDef::dimension("Region", ValueType::Text),
            FieldDef::dimension("Fuel", ValueType::Text),
            FieldDef::dimension("Station", ValueType::Text),
            FieldDef::measure("Value"),
        ])
        .unwrap()
    }

    pub fn data() -> Vec<(i32, Option<&'static str>, &'static str, &'static str, Option<f64>)> {
        vec![
            (2020, Some("Sul"), "Diesel", "Posto A", Some(100.0)),
            (2020, Some("Sul"), "Gasolina", "Posto A", Some(50.0)),
            (2020, Some("Norte"), "Diesel", "Posto B", Some(70.0)),
            (2021, Some("Norte"), "Etanol", "Posto B", Some(30.0)),
            (2021, Some("Sul"), "Diesel", "Posto C", None),
            (2021, None, "Gasolina", "Posto C", Some(45.0)),
            (2022, Some("Sudeste"), "Gasolina", "Posto A", Some(120.0)),
        ]
    }

    pub fn records() -> RecordSet {
        let rows = Self::data().into_iter().map(|(year, region, fuel, station, value)| {
            vec![
                Value::from(year),
                Value::from(region),
                Value::text(fuel),
                Value::text(station),
                Value::from(value),
            ]
        });
        RecordSet::from_rows(Self::schema(), rows).unwrap()
    }
}

/// Builds a record set from (dimension, measure) pairs.
pub fn keyed_records(dimension: &str, measure: &str, rows: &[(&str, Option<f64>)]) -> RecordSet {
    let schema = Schema::new(vec![
        FieldDef::dimension(dimension, ValueType::Text),
        FieldDef::measure(measure),
    ])
    .unwrap();

    RecordSet::from_rows(
        schema,
        rows.iter()
            .map(|(key, value)| vec![Value::text(*key), Value::from(*value)]),
    )
    .unwrap()
}
