//! FILENAME: tests/common/mod.rs
//! Sample warehouse rows shared by the dashboard tests.
#![allow(dead_code)]

use dashboard_lib::warehouse::*;
use dataset::{RecordSet, Schema, Value};

/// One fact row; fields left out of the struct stay missing.
pub struct Sale {
    pub ano: i32,
    pub mes: i32,
    pub estado: &'static str,
    pub municipio: &'static str,
    pub regiao: Option<&'static str>,
    pub bandeira: Option<&'static str>,
    pub posto: &'static str,
    pub combustivel: Option<&'static str>,
    pub valor: Option<f64>,
    pub icms: f64,
    pub impacto: Option<f64>,
    pub producao: f64,
}

pub struct FuelFixture;

impl FuelFixture {
    pub fn sales() -> Vec<Sale> {
        vec![
            Sale {
                ano: 2020,
                mes: 1,
                estado: "SP",
                municipio: "São Paulo",
                regiao: Some("Sudeste"),
                bandeira: Some("Shell"),
                posto: "Posto A",
                combustivel: Some("Gasolina"),
                valor: Some(100.0),
                icms: 18.0,
                impacto: Some(18.0),
                producao: 1000.0,
            },
            Sale {
                ano: 2020,
                mes: 1,
                estado: "SP",
                municipio: "Campinas",
                regiao: Some("Sudeste"),
                bandeira: Some("Ipiranga"),
                posto: "Posto B",
                combustivel: Some("Diesel"),
                valor: Some(200.0),
                icms: 12.0,
                impacto: Some(24.0),
                producao: 500.0,
            },
            Sale {
                ano: 2020,
                mes: 2,
                estado: "RJ",
                municipio: "Rio de Janeiro",
                regiao: Some("Sudeste"),
                bandeira: Some("Shell"),
                posto: "Posto C",
                combustivel: Some("Gasolina"),
                valor: Some(150.0),
                icms: 20.0,
                impacto: Some(30.0),
                producao: 700.0,
            },
            Sale {
                ano: 2021,
                mes: 2,
                estado: "BA",
                municipio: "Salvador",
                regiao: Some("Nordeste"),
                bandeira: Some("BR"),
                posto: "Posto D",
                combustivel: Some("Etanol"),
                valor: Some(80.0),
                icms: 19.0,
                impacto: Some(15.0),
                producao: 300.0,
            },
            Sale {
                ano: 2021,
                mes: 3,
                estado: "BA",
                municipio: "Salvador",
                regiao: None,
                bandeira: Some("BR"),
                posto: "Posto D",
                combustivel: Some("Diesel"),
                valor: Some(120.0),
                icms: 19.0,
                impacto: Some(23.0),
                producao: 200.0,
            },
            Sale {
                ano: 2021,
                mes: 3,
                estado: "SP",
                municipio: "São Paulo",
                regiao: Some("Sudeste"),
                bandeira: None,
                posto: "Posto E",
                combustivel: Some("Gasolina"),
                valor: Some(60.0),
                icms: 18.0,
                impacto: Some(10.0),
                producao: 0.0,
            },
            Sale {
                ano: 2021,
                mes: 1,
                estado: "RJ",
                municipio: "Niterói",
                regiao: Some("Sudeste"),
                bandeira: Some("Ipiranga"),
                posto: "Posto F",
                combustivel: None,
                valor: Some(90.0),
                icms: 20.0,
                impacto: Some(18.0),
                producao: 100.0,
            },
            Sale {
                ano: 2021,
                mes: 2,
                estado: "SP",
                municipio: "Campinas",
                regiao: Some("Sudeste"),
                bandeira: Some("Shell"),
                posto: "Posto A",
                combustivel: Some("Gasolina"),
                valor: None,
                icms: 18.0,
                impacto: None,
                producao: 400.0,
            },
        ]
    }

    /// The sample rows over the full warehouse schema.
    pub fn records() -> RecordSet {
        Self::records_with(fuel_sales_schema().unwrap())
    }

    /// The sample rows projected onto `schema` (which must be a subset of
    /// the warehouse fields).
    pub fn records_with(schema: Schema) -> RecordSet {
        let rows: Vec<Vec<Value>> = Self::sales()
            .iter()
            .map(|sale| {
                schema
                    .names()
                    .into_iter()
                    .map(|name| Self::value_of(sale, name))
                    .collect()
            })
            .collect();
        RecordSet::from_rows(schema, rows).unwrap()
    }

    fn value_of(sale: &Sale, field: &str) -> Value {
        match field {
            ANO => Value::from(sale.ano),
            MES => Value::from(sale.mes),
            TRIMESTRE => Value::from((sale.mes - 1) / 3 + 1),
            ESTADO => Value::text(sale.estado),
            MUNICIPIO => Value::text(sale.municipio),
            REGIAO => Value::from(sale.regiao),
            BANDEIRA => Value::from(sale.bandeira),
            NOME_POSTO => Value::text(sale.posto),
            TIPO_COMBUSTIVEL => Value::from(sale.combustivel),
            VALOR_VENDA => Value::from(sale.valor),
            ICMS_MEDIO => Value::from(sale.icms),
            IMPACTO_ICMS => Value::from(sale.impacto),
            VALOR_PRODUCAO_PETROLEO => Value::from(sale.producao),
            UNIDADE => Value::text("R$/litro"),
            _ => Value::Missing,
        }
    }
}
