//! FILENAME: app/cli/src/cli.rs
// PURPOSE: Command line surface of the dashboard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DashboardConfig, EmptyCellMode};
use crate::error::DashboardError;

#[derive(Parser, Debug)]
#[command(name = "fuel-olap", version, about = "OLAP analyses of fuel sales and ICMS")]
pub struct Cli {
    /// JSON configuration file; flags and FUEL_OLAP_* variables override it.
    #[arg(long, global = true, env = "FUEL_OLAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "FUEL_OLAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Also write log lines to this file.
    #[arg(long, global = true, env = "FUEL_OLAP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available analyses.
    List,
    /// Run one analysis over a warehouse export.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Analysis id or menu number (see `list`).
    pub analysis: String,

    /// CSV or XLSX export of the warehouse join.
    #[arg(long, env = "FUEL_OLAP_DATA")]
    pub data: Option<PathBuf>,

    /// Worksheet to read from an XLSX file (first sheet by default).
    #[arg(long, env = "FUEL_OLAP_SHEET")]
    pub sheet: Option<String>,

    /// Number of brands in the fuel x brand ranking (3 to 50).
    #[arg(long, env = "FUEL_OLAP_TOP_N")]
    pub top_n: Option<usize>,

    /// Number of stations in the average ticket chart section.
    #[arg(long, env = "FUEL_OLAP_TICKET_TOP_N")]
    pub ticket_top_n: Option<usize>,

    /// How cells without data are shown.
    #[arg(long, value_enum, env = "FUEL_OLAP_EMPTY_CELL")]
    pub empty_cell: Option<EmptyCellMode>,

    /// Write the report to an .xlsx or .json file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Cli {
    /// File settings (or defaults) with every given flag applied on top.
    pub fn resolve_config(&self) -> Result<DashboardConfig, DashboardError> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Command::Run(args) = &self.command {
            args.apply(&mut config);
        }

        Ok(config)
    }
}

impl RunArgs {
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(data) = &self.data {
            config.data_path = Some(data.clone());
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(ticket_top_n) = self.ticket_top_n {
            config.ticket_top_n = ticket_top_n;
        }
        if let Some(mode) = self.empty_cell {
            config.empty_cell = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "fuel-olap", "run", "5", "--data", "vendas.csv", "--top-n", "15", "--empty-cell", "nan",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("vendas.csv")));
        assert_eq!(config.top_n, 15);
        assert_eq!(config.empty_cell, EmptyCellMode::Nan);
        assert_eq!(config.ticket_top_n, 20);

        match cli.command {
            Command::Run(args) => assert_eq!(args.analysis, "5"),
            Command::List => panic!("expected run"),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"top_n": 30, "sheet": "Fato", "log_level": "info"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "fuel-olap",
            "--config",
            path.to_str().unwrap(),
            "run",
            "sales-by-fuel-and-brand",
            "--top-n",
            "5",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.sheet.as_deref(), Some("Fato"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_list_parses() {
        let cli = Cli::try_parse_from(["fuel-olap", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List));
    }
}
