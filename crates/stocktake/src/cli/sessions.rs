//! Sessions and show commands - review captured lines grouped by session

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use stocktake::{ScanLine, SessionSummary};

use crate::cli::error::HelpfulError;
use crate::cli::output::{format_created, plural, print_table, truncate};

/// Arguments for the `sessions` command
#[derive(Debug, Args)]
pub struct SessionsArgs {
    /// Lines file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Lines file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Session key (device|warehouse|zone|bin)
    pub session: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionsOutput {
    sessions: Vec<SessionSummary>,
    total_lines: usize,
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    session: SessionSummary,
    lines: &'a [&'a ScanLine],
}

pub fn run(args: SessionsArgs) -> Result<()> {
    let set = super::load_lines_by_created(&args.file)?;
    let index = set.aggregate();

    if args.json {
        let output = SessionsOutput {
            sessions: index.summaries(),
            total_lines: index.total_lines(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("No sessions in {}", args.file.display());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = index
        .summaries()
        .into_iter()
        .map(|s| {
            vec![
                s.index.to_string(),
                s.device_id,
                s.warehouse,
                s.zone,
                s.storage_bin,
                s.line_count.to_string(),
            ]
        })
        .collect();
    print_table(&["#", "DEVICE", "WAREHOUSE", "ZONE", "BIN", "LINES"], rows);
    println!(
        "{} ({})",
        plural(index.len(), "session"),
        plural(index.total_lines(), "line")
    );
    Ok(())
}

pub fn run_show(args: ShowArgs) -> Result<()> {
    let set = super::load_lines_by_created(&args.file)?;
    let index = set.aggregate();

    let key = args.session.trim();
    let (position, group) = match index.position(key).zip(index.get(key)) {
        Some(found) => found,
        None => return Err(HelpfulError::session_not_found(key, index.keys()).into()),
    };
    let summary = group.summary(position);

    if args.json {
        let output = ShowOutput {
            session: summary,
            lines: group.lines(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Session {}: {}", summary.index, group.location);
    let rows: Vec<Vec<String>> = group
        .lines()
        .iter()
        .map(|line| {
            vec![
                line.id.to_string(),
                line.barcode.clone(),
                line.material_code.clone(),
                truncate(&line.material_desc, 32),
                line.batch.clone(),
                stocktake::export::format_qty(line.qty),
                format_created(line.created_at),
            ]
        })
        .collect();
    print_table(
        &["ID", "BARCODE", "MATERIAL", "DESCRIPTION", "BATCH", "QTY", "CREATED"],
        rows,
    );
    println!("{}", plural(group.line_count(), "line"));
    Ok(())
}
