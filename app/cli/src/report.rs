//! FILENAME: app/cli/src/report.rs
//! The output of one analysis: titled sections of pivot tables or rankings,
//! ready for the text renderer or for export.

use persistence::{Sheet, Workbook};
use pivot_engine::{PivotTable, Ranking};
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub analysis: Analysis,
    pub title: String,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionBody {
    Table(PivotTable),
    Ranking(Ranking),
}

impl ReportSection {
    pub fn table(heading: impl Into<String>, table: PivotTable) -> Self {
        ReportSection {
            heading: heading.into(),
            body: SectionBody::Table(table),
        }
    }

    pub fn ranking(heading: impl Into<String>, ranking: Ranking) -> Self {
        ReportSection {
            heading: heading.into(),
            body: SectionBody::Ranking(ranking),
        }
    }

    pub fn as_table(&self) -> Option<&PivotTable> {
        match &self.body {
            SectionBody::Table(table) => Some(table),
            SectionBody::Ranking(_) => None,
        }
    }

    pub fn as_ranking(&self) -> Option<&Ranking> {
        match &self.body {
            SectionBody::Ranking(ranking) => Some(ranking),
            SectionBody::Table(_) => None,
        }
    }
}

impl Report {
    pub fn new(analysis: Analysis) -> Self {
        Report {
            analysis,
            title: analysis.title().to_string(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// One worksheet per section, named after its heading.
    pub fn to_workbook(&self) -> Workbook {
        let mut workbook = Workbook::new();
        for section in &self.sections {
            let sheet = match &section.body {
                SectionBody::Table(table) => Sheet::from_pivot(&section.heading, table),
                SectionBody::Ranking(ranking) => Sheet::from_ranking(&section.heading, ranking),
            };
            workbook.add_sheet(sheet);
        }
        workbook
    }
}
