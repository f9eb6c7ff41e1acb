//! FILENAME: tests/test_analyses.rs
//! The predefined analyses over the sample warehouse rows.

mod common;

use common::FuelFixture;
use dashboard_lib::render::render_report;
use dashboard_lib::warehouse::*;
use dashboard_lib::{
    export_report, load_warehouse, run_analysis, Analysis, AnalysisOptions, DashboardConfig,
    DashboardError, Report,
};
use dataset::{FieldDef, Schema, ValueType};
use pivot_engine::{AxisValue, EmptyCell, PivotEngine, PivotTable, Ranking};

fn run(analysis: Analysis) -> Report {
    run_with(analysis, AnalysisOptions::default())
}

fn run_with(analysis: Analysis, options: AnalysisOptions) -> Report {
    analysis
        .run(&PivotEngine::default(), &FuelFixture::records(), &options)
        .unwrap()
}

fn table(report: &Report, index: usize) -> &PivotTable {
    report.sections[index].as_table().unwrap()
}

fn ranking(report: &Report, index: usize) -> &Ranking {
    report.sections[index].as_ranking().unwrap()
}

fn keys(values: &[&str]) -> Vec<AxisValue> {
    values.iter().map(|v| AxisValue::from(*v)).collect()
}

// ============================================================================
// ANALYSES
// ============================================================================

#[test]
fn test_sales_by_fuel_and_year() {
    let report = run(Analysis::SalesByFuelAndYear);
    let sales = table(&report, 0);

    assert_eq!(sales.row_keys, vec![AxisValue::from(2020), AxisValue::from(2021)]);
    assert_eq!(sales.column_keys, keys(&["Diesel", "Etanol", "Gasolina"]));
    assert_eq!(sales.row(0), &[200.0, 0.0, 250.0]);
    assert_eq!(sales.row(1), &[120.0, 80.0, 60.0]);
}

#[test]
fn test_icms_by_state_and_city() {
    let report = run(Analysis::IcmsByStateAndCity);

    let icms = table(&report, 0);
    assert_eq!(icms.row_keys, keys(&["BA", "RJ", "SP"]));
    assert_eq!(
        icms.column_keys,
        keys(&["Campinas", "Niterói", "Rio de Janeiro", "Salvador", "São Paulo"])
    );
    assert_eq!(icms.get(&"SP".into(), &"Campinas".into()), Some(15.0));
    assert_eq!(icms.get(&"SP".into(), &"Salvador".into()), Some(0.0));

    let distribution = table(&report, 1);
    assert_eq!(distribution.column_keys, keys(&["min", "median", "mean", "max"]));
    assert_eq!(distribution.row(2), &[12.0, 18.0, 16.5, 18.0]);
    assert_eq!(distribution.row(0), &[19.0, 19.0, 19.0, 19.0]);
    assert_eq!(distribution.get(&"SP".into(), &"max".into()), Some(18.0));
    assert_eq!(distribution.get(&"SP".into(), &"min".into()), Some(12.0));
}

#[test]
fn test_icms_nan_policy_leaves_gaps() {
    let options = AnalysisOptions {
        empty_cell: EmptyCell::NaN,
        ..AnalysisOptions::default()
    };
    let report = run_with(Analysis::IcmsByStateAndCity, options);

    let icms = table(&report, 0);
    assert!(icms.get(&"SP".into(), &"Salvador".into()).unwrap().is_nan());
    assert!(render_report(&report).contains("ICMS Médio (Estado x Município)"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icms.json");
    export_report(&report, &path).unwrap();

    let back: Report = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let reloaded = table(&back, 0);
    assert!(reloaded.get(&"SP".into(), &"Salvador".into()).unwrap().is_nan());
    assert_eq!(reloaded.get(&"SP".into(), &"Campinas".into()), Some(15.0));
}

#[test]
fn test_icms_impact_by_brand_and_station() {
    let report = run(Analysis::IcmsImpactByBrandAndStation);

    let impact = table(&report, 0);
    assert_eq!(impact.row_keys, keys(&["BR", "Ipiranga", "Shell"]));
    assert!(!impact.column_keys.contains(&AxisValue::from("Posto E")));

    let totals = ranking(&report, 1);
    assert_eq!(
        totals.pairs(),
        vec![
            (AxisValue::from("Shell"), 48.0),
            (AxisValue::from("Ipiranga"), 42.0),
            (AxisValue::from("BR"), 38.0),
        ]
    );
}

#[test]
fn test_sales_by_region_and_month() {
    let report = run(Analysis::SalesByRegionAndMonth);
    let sales = table(&report, 0);

    assert_eq!(sales.row_keys, vec![AxisValue::from(1), AxisValue::from(2), AxisValue::from(3)]);
    assert_eq!(sales.column_keys, keys(&["Nordeste", "Sudeste"]));
    assert_eq!(sales.row(0), &[0.0, 390.0]);
    assert_eq!(sales.row(1), &[80.0, 150.0]);
    assert_eq!(sales.row(2), &[0.0, 60.0]);
}

#[test]
fn test_sales_by_fuel_and_brand() {
    let report = run(Analysis::SalesByFuelAndBrand);

    let sales = table(&report, 0);
    assert_eq!(sales.row_keys, keys(&["Diesel", "Etanol", "Gasolina"]));
    assert_eq!(sales.column_keys, keys(&["BR", "Ipiranga", "Shell"]));
    assert_eq!(sales.row(0), &[120.0, 200.0, 0.0]);
    assert_eq!(sales.row(2), &[0.0, 0.0, 250.0]);

    // Ties keep ascending brand order.
    let brands = ranking(&report, 1);
    assert_eq!(brands.keys(), keys(&["Shell", "BR", "Ipiranga"]));
    assert_eq!(report.sections[1].heading, "TOP 10 Bandeiras");
    assert!(report.section("TOP 10 Bandeiras").unwrap().as_ranking().is_some());
    assert!(report.section("TOP 3 Bandeiras").is_none());

    let restricted = table(&report, 2);
    assert_eq!(restricted.column_keys, sales.column_keys);
}

#[test]
fn test_sales_by_fuel_and_brand_top_n_is_clamped() {
    let options = AnalysisOptions {
        top_n: 1,
        ..AnalysisOptions::default()
    };
    let report = run_with(Analysis::SalesByFuelAndBrand, options);

    assert_eq!(ranking(&report, 1).len(), 3);
    assert_eq!(report.sections[1].heading, "TOP 3 Bandeiras");
}

#[test]
fn test_oil_production_by_region_and_year() {
    let report = run(Analysis::OilProductionByRegionAndYear);

    let national = table(&report, 0);
    assert_eq!(national.row(0), &[2200.0]);
    assert_eq!(national.row(1), &[1000.0]);

    let shares = table(&report, 1);
    assert_eq!(shares.column_keys, keys(&["Nordeste", UNKNOWN_REGION, "Sudeste"]));
    assert_eq!(shares.row(0), &[0.0, 0.0, 100.0]);
    assert_eq!(shares.row(1), &[30.0, 20.0, 50.0]);

    let by_region = table(&report, 2);
    assert_eq!(by_region.row(1), &[300.0, 200.0, 500.0]);
    assert_eq!(by_region.row_totals(), vec![2200.0, 1000.0]);
}

#[test]
fn test_average_ticket_by_station() {
    let options = AnalysisOptions {
        ticket_top_n: 2,
        ..AnalysisOptions::default()
    };
    let report = run_with(Analysis::AverageTicketByStation, options);

    let top = ranking(&report, 0);
    assert_eq!(
        top.pairs(),
        vec![(AxisValue::from("Posto B"), 200.0), (AxisValue::from("Posto C"), 150.0)]
    );

    let full = ranking(&report, 1);
    assert_eq!(
        full.keys(),
        keys(&["Posto B", "Posto C", "Posto A", "Posto D", "Posto F", "Posto E"])
    );
}

// ============================================================================
// SCHEMA CHECKS AND FILES
// ============================================================================

#[test]
fn test_missing_columns_are_reported_together() {
    let schema = Schema::new(vec![
        FieldDef::dimension(ANO, ValueType::Number),
        FieldDef::measure(VALOR_VENDA),
    ])
    .unwrap();
    let records = FuelFixture::records_with(schema);

    let err = Analysis::IcmsImpactByBrandAndStation
        .run(&PivotEngine::default(), &records, &AnalysisOptions::default())
        .unwrap_err();

    match err {
        DashboardError::MissingColumns { analysis, missing } => {
            assert_eq!(analysis, "icms-impact-by-brand-and-station");
            assert_eq!(missing, vec![BANDEIRA, NOME_POSTO, IMPACTO_ICMS]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_every_analysis_runs_on_fixture() {
    let records = FuelFixture::records();
    let config = DashboardConfig::default();

    for analysis in Analysis::ALL {
        let report = run_analysis(analysis, &records, &config).unwrap();
        assert_eq!(report.analysis, analysis);
        assert!(!report.sections.is_empty());
        assert!(render_report(&report).starts_with(&format!("{} - ", analysis.number())));
    }
}

#[test]
fn test_csv_end_to_end_with_export() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("vendas.csv");
    std::fs::write(
        &data,
        "Ano,Tipo_combustivel,Valor_venda,Observacao\n\
         2020,Diesel,10.5,x\n\
         2020,Gasolina,,y\n\
         2021,Diesel,4,z\n",
    )
    .unwrap();

    let config = DashboardConfig {
        data_path: Some(data),
        ..DashboardConfig::default()
    };
    let records = load_warehouse(&config).unwrap();
    assert_eq!(records.schema().names(), vec![VALOR_VENDA, TIPO_COMBUSTIVEL, ANO]);

    let report = run_analysis(Analysis::SalesByFuelAndYear, &records, &config).unwrap();
    assert_eq!(table(&report, 0).row(0), &[10.5, 0.0]);

    let xlsx = dir.path().join("relatorio.xlsx");
    export_report(&report, &xlsx).unwrap();
    assert!(xlsx.exists());

    let json = dir.path().join("relatorio.json");
    export_report(&report, &json).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(parsed["analysis"], "sales-by-fuel-and-year");
    assert_eq!(parsed["sections"][0]["body"]["kind"], "table");

    let err = export_report(&report, &dir.path().join("relatorio.txt")).unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));

    let missing = run_analysis(Analysis::AverageTicketByStation, &records, &config).unwrap_err();
    assert!(matches!(
        missing,
        DashboardError::MissingColumns { ref missing, .. }
            if missing == &vec![NOME_POSTO.to_string()]
    ));
}
