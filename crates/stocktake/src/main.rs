//! Stock-take command line
//!
//! Decodes scanner payloads, looks them up in warehouse master data, and
//! reviews or exports scan lines dumped from the record store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stocktake::StocktakeConfig;
use stocktake_logging::{init_logging, Console, LogConfig};
use tracing::debug;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "stocktake", version, about = "Warehouse stock-take scan tools")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.stocktake/config.toml)
    #[arg(long, global = true, env = "STOCKTAKE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode raw scans into barcode and batch
    Decode(cli::decode::DecodeArgs),

    /// Decode a scan and look it up in a warehouse catalog
    Lookup(cli::decode::LookupArgs),

    /// List sessions in a lines file
    Sessions(cli::sessions::SessionsArgs),

    /// Show the lines of one session
    Show(cli::sessions::ShowArgs),

    /// Export rows for every line or one session
    Export(cli::export::ExportArgs),

    /// Correct the batch and quantity of a line
    Edit(cli::edit::EditArgs),

    /// Delete a line
    Delete(cli::edit::DeleteArgs),

    /// Show the resolved configuration
    Config(cli::config::ConfigArgs),
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Decode(args) => args.json,
        Commands::Lookup(args) => args.json,
        Commands::Sessions(args) => args.json,
        Commands::Show(args) => args.json,
        // Export always writes its table as JSON on stdout.
        Commands::Export(_) => true,
        Commands::Config(args) => args.json,
        Commands::Edit(_) | Commands::Delete(_) => false,
    }
}

fn run_command(command: Commands, config: &StocktakeConfig) -> Result<()> {
    match command {
        Commands::Decode(args) => cli::decode::run(args),
        Commands::Lookup(args) => cli::decode::run_lookup(args, config),
        Commands::Sessions(args) => cli::sessions::run(args),
        Commands::Show(args) => cli::sessions::run_show(args),
        Commands::Export(args) => cli::export::run(args),
        Commands::Edit(args) => cli::edit::run(args),
        Commands::Delete(args) => cli::edit::run_delete(args),
        Commands::Config(args) => cli::config::run(args, config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    let config = match StocktakeConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let err = anyhow::Error::new(err);
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{}", cli::HelpfulError::new(format!("{:#}", err))
                    .with_suggestion("TRY: Pass a different file with --config or unset STOCKTAKE_CONFIG"));
            }
            return ExitCode::from(1);
        }
    };

    if let Err(err) = init_logging(LogConfig {
        app_name: "stocktake",
        console: Console::from_flags(cli.verbose, json_mode),
        default_filter: config.log_filter.as_deref(),
    }) {
        eprintln!("warning: logging disabled: {:#}", err);
    }
    debug!(command = ?cli.command, catalogs = config.catalogs.len(), "starting");

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else if let Some(helpful) = err.downcast_ref::<cli::HelpfulError>() {
                eprint!("{}", helpful);
            } else {
                eprintln!("ERROR: {:#}", err);
            }
            ExitCode::from(1)
        }
    }
}
