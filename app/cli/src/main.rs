//! FILENAME: app/cli/src/main.rs

use clap::Parser;
use dashboard_lib::cli::{Cli, Command};
use dashboard_lib::render::{render_catalog, render_report};
use dashboard_lib::{export_report, load_warehouse, log_error, logging, run_analysis, Analysis};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    logging::init(config.level_filter()?, config.log_file.as_deref())?;

    let result = match &cli.command {
        Command::List => {
            println!("{}", render_catalog());
            Ok(())
        }
        Command::Run(args) => Analysis::from_id(&args.analysis).and_then(|analysis| {
            let records = load_warehouse(&config)?;
            let report = run_analysis(analysis, &records, &config)?;
            println!("{}", render_report(&report));

            if let Some(path) = &args.export {
                export_report(&report, path)?;
            }
            Ok(())
        }),
    };

    if let Err(e) = &result {
        log_error!("CLI", "{}", e);
    }
    Ok(result?)
}
