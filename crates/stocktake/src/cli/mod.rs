//! CLI module for the stock-take tools
//!
//! Every command works on a lines file: the collection exported from the
//! record store, either a JSON array or JSON-lines.

pub mod error;
pub mod output;

pub mod config;
pub mod decode;
pub mod edit;
pub mod export;
pub mod sessions;

pub use error::HelpfulError;

use anyhow::Result;
use std::path::Path;
use stocktake::{LineSet, ScanLine};
use stocktake_protocol::ProtocolError;

/// Read a lines file in stored order.
pub fn load_lines(path: &Path) -> Result<LineSet> {
    if !path.exists() {
        return Err(HelpfulError::file_not_found(path).into());
    }
    let lines = stocktake_protocol::read_lines(path).map_err(|err| match err {
        ProtocolError::Io { .. } => anyhow::Error::new(err),
        other => HelpfulError::invalid_lines_file(path, &other.to_string()).into(),
    })?;
    let set = LineSet::new(lines);
    tracing::debug!(path = %path.display(), lines = set.len(), "loaded lines file");
    Ok(set)
}

/// Read a lines file ordered by creation time, the order sessions are built from.
pub fn load_lines_by_created(path: &Path) -> Result<LineSet> {
    let mut set = load_lines(path)?;
    set.sort_by_created();
    Ok(set)
}

pub fn save_lines(path: &Path, lines: &[ScanLine]) -> Result<()> {
    stocktake_protocol::write_lines(path, lines)?;
    Ok(())
}
