//! FILENAME: app/cli/src/config.rs
// PURPOSE: Dashboard settings, loaded from an optional JSON file and then
// overridden by command line flags and FUEL_OLAP_* environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::LevelFilter;
use pivot_engine::EmptyCell;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub const DEFAULT_TOP_N: usize = 10;
pub const MIN_TOP_N: usize = 3;
pub const MAX_TOP_N: usize = 50;
pub const DEFAULT_TICKET_TOP_N: usize = 20;

/// How cells without contributing values are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCellMode {
    /// Zero, like a pandas pivot with fill_value=0.
    #[default]
    Fill,
    /// NaN, rendered blank.
    Nan,
}

impl EmptyCellMode {
    pub fn policy(self) -> EmptyCell {
        match self {
            EmptyCellMode::Fill => EmptyCell::Fill(0.0),
            EmptyCellMode::Nan => EmptyCell::NaN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: Option<PathBuf>,
    pub sheet: Option<String>,
    pub top_n: usize,
    pub ticket_top_n: usize,
    pub empty_cell: EmptyCellMode,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: None,
            sheet: None,
            top_n: DEFAULT_TOP_N,
            ticket_top_n: DEFAULT_TICKET_TOP_N,
            empty_cell: EmptyCellMode::default(),
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, DashboardError> {
        let text = fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, DashboardError> {
        serde_json::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn level_filter(&self) -> Result<LevelFilter, DashboardError> {
        self.log_level
            .parse()
            .map_err(|_| DashboardError::Config(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn data_path(&self) -> Result<&Path, DashboardError> {
        self.data_path
            .as_deref()
            .ok_or_else(|| DashboardError::Config("no data file given (use --data)".to_string()))
    }
}
