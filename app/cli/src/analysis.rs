//! FILENAME: app/cli/src/analysis.rs
//! The predefined dashboard analyses.
//!
//! Each variant names the dimensions, measure and reduction of its main
//! pivot plus any follow-up views (rankings, shares, distributions). All of
//! them run on the same `PivotEngine`; nothing here aggregates by hand.

use dataset::{RecordSet, Value};
use pivot_engine::{
    aggregations, EmptyCell, PivotEngine, PivotSpec, PivotTable, RankedItem, Ranking,
};
use serde::{Deserialize, Serialize};

use crate::config::{
    DashboardConfig, DEFAULT_TICKET_TOP_N, DEFAULT_TOP_N, MAX_TOP_N, MIN_TOP_N,
};
use crate::error::DashboardError;
use crate::log_info;
use crate::report::{Report, ReportSection};
use crate::warehouse::*;

/// Per-state distribution columns of the ICMS analysis.
const DISTRIBUTION: [&str; 4] = [
    aggregations::MIN,
    aggregations::MEDIAN,
    aggregations::MEAN,
    aggregations::MAX,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Analysis {
    SalesByFuelAndYear,
    IcmsByStateAndCity,
    IcmsImpactByBrandAndStation,
    SalesByRegionAndMonth,
    SalesByFuelAndBrand,
    OilProductionByRegionAndYear,
    AverageTicketByStation,
}

/// Knobs the analyses take from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Brands kept by the fuel x brand ranking, before clamping.
    pub top_n: usize,
    /// Stations kept by the average ticket chart section.
    pub ticket_top_n: usize,
    pub empty_cell: EmptyCell,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            top_n: DEFAULT_TOP_N,
            ticket_top_n: DEFAULT_TICKET_TOP_N,
            empty_cell: EmptyCell::default(),
        }
    }
}

impl From<&DashboardConfig> for AnalysisOptions {
    fn from(config: &DashboardConfig) -> Self {
        AnalysisOptions {
            top_n: config.top_n,
            ticket_top_n: config.ticket_top_n,
            empty_cell: config.empty_cell.policy(),
        }
    }
}

impl AnalysisOptions {
    /// Brand ranking size, clamped to the supported range.
    pub fn clamped_top_n(&self) -> usize {
        self.top_n.clamp(MIN_TOP_N, MAX_TOP_N)
    }
}

impl Analysis {
    pub const ALL: [Analysis; 7] = [
        Analysis::SalesByFuelAndYear,
        Analysis::IcmsByStateAndCity,
        Analysis::IcmsImpactByBrandAndStation,
        Analysis::SalesByRegionAndMonth,
        Analysis::SalesByFuelAndBrand,
        Analysis::OilProductionByRegionAndYear,
        Analysis::AverageTicketByStation,
    ];

    /// 1-based position in the dashboard menu.
    pub fn number(self) -> usize {
        match self {
            Analysis::SalesByFuelAndYear => 1,
            Analysis::IcmsByStateAndCity => 2,
            Analysis::IcmsImpactByBrandAndStation => 3,
            Analysis::SalesByRegionAndMonth => 4,
            Analysis::SalesByFuelAndBrand => 5,
            Analysis::OilProductionByRegionAndYear => 6,
            Analysis::AverageTicketByStation => 7,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Analysis::SalesByFuelAndYear => "sales-by-fuel-and-year",
            Analysis::IcmsByStateAndCity => "icms-by-state-and-city",
            Analysis::IcmsImpactByBrandAndStation => "icms-impact-by-brand-and-station",
            Analysis::SalesByRegionAndMonth => "sales-by-region-and-month",
            Analysis::SalesByFuelAndBrand => "sales-by-fuel-and-brand",
            Analysis::OilProductionByRegionAndYear => "oil-production-by-region-and-year",
            Analysis::AverageTicketByStation => "average-ticket-by-station",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Analysis::SalesByFuelAndYear => "Vendas por Tipo de Combustível e Ano",
            Analysis::IcmsByStateAndCity => "ICMS Médio por Estado e Município",
            Analysis::IcmsImpactByBrandAndStation => "Impacto do ICMS por Posto e Bandeira",
            Analysis::SalesByRegionAndMonth => "Venda total por Região e Mês",
            Analysis::SalesByFuelAndBrand => "Vendas por Tipo de Combustível e Bandeira",
            Analysis::OilProductionByRegionAndYear => {
                "Produção Nacional de Petróleo por Região e Ano"
            }
            Analysis::AverageTicketByStation => "Ticket Médio por Posto",
        }
    }

    /// Accepts the kebab-case id or the menu number.
    pub fn from_id(id: &str) -> Result<Analysis, DashboardError> {
        let id = id.trim();
        Analysis::ALL
            .into_iter()
            .find(|a| a.id() == id || a.number().to_string() == id)
            .ok_or_else(|| DashboardError::UnknownAnalysis(id.to_string()))
    }

    /// Columns the analysis reads.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Analysis::SalesByFuelAndYear => &[ANO, TIPO_COMBUSTIVEL, VALOR_VENDA],
            Analysis::IcmsByStateAndCity => &[ESTADO, MUNICIPIO, ICMS_MEDIO],
            Analysis::IcmsImpactByBrandAndStation => &[BANDEIRA, NOME_POSTO, IMPACTO_ICMS],
            Analysis::SalesByRegionAndMonth => &[MES, REGIAO, VALOR_VENDA],
            Analysis::SalesByFuelAndBrand => &[TIPO_COMBUSTIVEL, BANDEIRA, VALOR_VENDA],
            Analysis::OilProductionByRegionAndYear => &[ANO, REGIAO, VALOR_PRODUCAO_PETROLEO],
            Analysis::AverageTicketByStation => &[NOME_POSTO, VALOR_VENDA],
        }
    }

    /// Fails with every required column the records lack.
    pub fn check_columns(self, records: &RecordSet) -> Result<(), DashboardError> {
        let missing = records.schema().missing(self.required_fields());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::MissingColumns {
                analysis: self.id().to_string(),
                missing: missing.into_iter().map(str::to_string).collect(),
            })
        }
    }

    pub fn run(
        self,
        engine: &PivotEngine,
        records: &RecordSet,
        options: &AnalysisOptions,
    ) -> Result<Report, DashboardError> {
        self.check_columns(records)?;

        log_info!("ANALYSIS", "run {} on {} records", self.id(), records.len());

        let mut report = Report::new(self);
        let fill = options.empty_cell;

        match self {
            Analysis::SalesByFuelAndYear => {
                let spec = PivotSpec::cross(ANO, TIPO_COMBUSTIVEL, VALOR_VENDA, aggregations::SUM)
                    .with_empty_cell(fill);
                report.push(ReportSection::table(
                    "Vendas por Ano x Combustível",
                    engine.pivot(records, &spec)?,
                ));
            }

            Analysis::IcmsByStateAndCity => {
                let spec = PivotSpec::cross(ESTADO, MUNICIPIO, ICMS_MEDIO, aggregations::MEAN)
                    .with_empty_cell(fill);
                report.push(ReportSection::table(
                    "ICMS Médio (Estado x Município)",
                    engine.pivot(records, &spec)?,
                ));
                report.push(ReportSection::table(
                    "Distribuição do ICMS Médio por Estado",
                    engine.summarize(records, ESTADO, ICMS_MEDIO, &DISTRIBUTION, fill)?,
                ));
            }

            Analysis::IcmsImpactByBrandAndStation => {
                let spec = PivotSpec::cross(BANDEIRA, NOME_POSTO, IMPACTO_ICMS, aggregations::SUM)
                    .with_empty_cell(fill);
                let table = engine.pivot(records, &spec)?;
                let totals = rank_row_totals(&table);
                report.push(ReportSection::table("Impacto do ICMS (Bandeira x Posto)", table));
                report.push(ReportSection::ranking("Impacto do ICMS por Bandeira", totals));
            }

            Analysis::SalesByRegionAndMonth => {
                let spec = PivotSpec::cross(MES, REGIAO, VALOR_VENDA, aggregations::SUM)
                    .with_empty_cell(fill);
                report.push(ReportSection::table(
                    "Vendas por Mês x Região",
                    engine.pivot(records, &spec)?,
                ));
            }

            Analysis::SalesByFuelAndBrand => {
                let cleaned = records.drop_missing(self.required_fields())?;
                let spec =
                    PivotSpec::cross(TIPO_COMBUSTIVEL, BANDEIRA, VALOR_VENDA, aggregations::SUM);
                let table = engine.pivot(&cleaned, &spec)?;

                let top_n = options.clamped_top_n();
                let brands =
                    engine.top_n(&cleaned, BANDEIRA, VALOR_VENDA, aggregations::SUM, top_n)?;
                let restricted = table.retain_columns(&brands.keys());

                report.push(ReportSection::table("Vendas (Combustível x Bandeira)", table));
                report.push(ReportSection::ranking(format!("TOP {} Bandeiras", top_n), brands));
                report.push(ReportSection::table(
                    format!("Vendas por Combustível - TOP {} Bandeiras", top_n),
                    restricted,
                ));
            }

            Analysis::OilProductionByRegionAndYear => {
                let filled = records.fill_missing(REGIAO, Value::text(UNKNOWN_REGION))?;

                let national = engine.pivot(
                    &filled,
                    &PivotSpec::new(ANO, VALOR_PRODUCAO_PETROLEO, aggregations::SUM),
                )?;
                let by_region = engine.pivot(
                    &filled,
                    &PivotSpec::cross(ANO, REGIAO, VALOR_PRODUCAO_PETROLEO, aggregations::SUM),
                )?;
                let shares = by_region.percent_of_row_total().round(2);

                report.push(ReportSection::table("Produção total por ano", national));
                report.push(ReportSection::table("Participação (%) das regiões", shares));
                report.push(ReportSection::table("Produção por região", by_region));
            }

            Analysis::AverageTicketByStation => {
                let ranking = engine.top_n(
                    records,
                    NOME_POSTO,
                    VALOR_VENDA,
                    aggregations::MEAN,
                    usize::MAX,
                )?;
                report.push(ReportSection::ranking(
                    format!("TOP {} Postos por Ticket Médio", options.ticket_top_n),
                    ranking.truncated(options.ticket_top_n),
                ));
                report.push(ReportSection::ranking("Ticket Médio por Posto", ranking));
            }
        }

        Ok(report)
    }
}

/// Row totals of a table as a ranking, largest first.
fn rank_row_totals(table: &PivotTable) -> Ranking {
    let mut items: Vec<RankedItem> = table
        .row_keys
        .iter()
        .cloned()
        .zip(table.row_totals())
        .map(|(key, value)| RankedItem { key, value })
        .collect();
    items.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));

    Ranking {
        dimension: table.row_field.clone(),
        measure: table.measure.clone(),
        aggregation: aggregations::SUM.to_string(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_accepts_id_and_number() {
        assert_eq!(
            Analysis::from_id("sales-by-fuel-and-brand").unwrap(),
            Analysis::SalesByFuelAndBrand
        );
        assert_eq!(Analysis::from_id("7").unwrap(), Analysis::AverageTicketByStation);
        assert!(matches!(
            Analysis::from_id("8"),
            Err(DashboardError::UnknownAnalysis(ref id)) if id == "8"
        ));
    }

    #[test]
    fn test_ids_are_unique_and_numbered() {
        for (i, analysis) in Analysis::ALL.iter().enumerate() {
            assert_eq!(analysis.number(), i + 1);
            assert_eq!(Analysis::from_id(analysis.id()).unwrap(), *analysis);
        }
    }

    #[test]
    fn test_required_fields_exist_in_warehouse() {
        let schema = fuel_sales_schema().unwrap();
        for analysis in Analysis::ALL {
            assert!(schema.missing(analysis.required_fields()).is_empty(), "{:?}", analysis);
        }
    }

    #[test]
    fn test_options_clamp_top_n_once() {
        let config = DashboardConfig {
            top_n: 2,
            ..DashboardConfig::default()
        };
        let options = AnalysisOptions::from(&config);
        assert_eq!(options.top_n, 2);
        assert_eq!(options.clamped_top_n(), MIN_TOP_N);

        let direct = AnalysisOptions {
            top_n: 80,
            ..AnalysisOptions::default()
        };
        assert_eq!(direct.clamped_top_n(), MAX_TOP_N);
    }
}
