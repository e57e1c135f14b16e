//! Export command - produce spreadsheet rows for all lines or one session

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use stocktake::{AggregateError, ExportError};

use crate::cli::error::HelpfulError;

/// Arguments for the `export` command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Lines file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Export only this session (device|warehouse|zone|bin)
    #[arg(short = 's', long)]
    pub session: Option<String>,

    /// Also write the table to this file as JSON
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let set = super::load_lines_by_created(&args.file)?;
    let index = set.aggregate();

    let table = match args.session.as_deref().map(str::trim) {
        Some(key) => stocktake::export_session(&index, key),
        None => stocktake::export_all(&index),
    }
    .map_err(|err| -> anyhow::Error {
        match err {
            ExportError::NoData => HelpfulError::no_data(&args.file).into(),
            ExportError::Session(AggregateError::SessionNotFound { key }) => {
                HelpfulError::session_not_found(&key, index.keys()).into()
            }
        }
    })?;

    tracing::info!(
        file_stem = %table.file_stem,
        rows = table.body().len(),
        "export prepared"
    );

    let json = serde_json::to_string_pretty(&table)?;
    if let Some(path) = &args.output {
        std::fs::write(path, format!("{}\n", json))?;
        eprintln!("Wrote {} rows to {}", table.body().len(), path.display());
    }
    println!("{}", json);
    Ok(())
}
