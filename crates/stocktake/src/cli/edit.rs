//! Edit and delete commands - correct or drop a stored line

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use stocktake::{LineEdit, LineId, ReviewError};

use crate::cli::error::HelpfulError;

/// Arguments for the `edit` command
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Lines file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Id of the line to correct
    pub id: String,

    /// Corrected batch
    #[arg(long)]
    pub batch: String,

    /// Corrected quantity
    #[arg(long)]
    pub qty: String,
}

/// Arguments for the `delete` command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Lines file (JSON array or JSON Lines)
    pub file: PathBuf,

    /// Id of the line to delete
    pub id: String,
}

fn parse_id(raw: &str) -> Result<LineId> {
    LineId::parse(raw).map_err(|_| HelpfulError::line_not_found(raw).into())
}

fn review_error(err: ReviewError, args_batch: &str, args_qty: &str) -> anyhow::Error {
    match err {
        ReviewError::InvalidEdit => HelpfulError::invalid_edit(args_batch, args_qty).into(),
        ReviewError::LineNotFound(id) => HelpfulError::line_not_found(id.as_str()).into(),
    }
}

pub fn run(args: EditArgs) -> Result<()> {
    let id = parse_id(&args.id)?;
    let edit = LineEdit::from_input(&args.batch, &args.qty)
        .map_err(|err| review_error(err, &args.batch, &args.qty))?;

    let mut set = super::load_lines(&args.file)?;
    let updated = set
        .replace(&id, &edit)
        .map_err(|err| review_error(err, &args.batch, &args.qty))?;
    println!(
        "Updated {}: batch {}, qty {}",
        updated.id,
        updated.batch,
        stocktake::export::format_qty(updated.qty)
    );

    super::save_lines(&args.file, set.as_slice())
}

pub fn run_delete(args: DeleteArgs) -> Result<()> {
    let id = parse_id(&args.id)?;
    let mut set = super::load_lines(&args.file)?;
    let removed = set
        .remove(&id)
        .map_err(|err| review_error(err, "", ""))?;

    super::save_lines(&args.file, set.as_slice())?;
    println!(
        "Deleted {} ({} in {})",
        removed.id,
        removed.barcode,
        removed.session_key()
    );
    Ok(())
}
