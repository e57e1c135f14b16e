//! Config command - show the resolved configuration

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stocktake::config::default_config_path;
use stocktake::StocktakeConfig;

use crate::cli::output::print_table;

/// Arguments for the `config` command
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ConfigOutput<'a> {
    home: String,
    default_config: String,
    logs: String,
    #[serde(flatten)]
    config: &'a StocktakeConfig,
}

pub fn run(args: ConfigArgs, config: &StocktakeConfig) -> Result<()> {
    let output = ConfigOutput {
        home: stocktake_logging::stocktake_home().display().to_string(),
        default_config: default_config_path().display().to_string(),
        logs: stocktake_logging::logs_dir().display().to_string(),
        config,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Home:        {}", output.home);
    println!("Config file: {}", output.default_config);
    println!("Logs:        {}", output.logs);
    println!(
        "Log filter:  {}",
        config
            .log_filter
            .as_deref()
            .unwrap_or(stocktake_logging::DEFAULT_LOG_FILTER)
    );

    if config.catalogs.is_empty() {
        println!("\nNo catalogs configured.");
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = config
        .catalogs
        .iter()
        .map(|c| {
            vec![
                c.warehouse.clone(),
                c.path.display().to_string(),
                if c.path.exists() { "yes" } else { "missing" }.to_string(),
            ]
        })
        .collect();
    print_table(&["WAREHOUSE", "CATALOG", "PRESENT"], rows);
    Ok(())
}
