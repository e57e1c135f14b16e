//! Export row data.
//!
//! Produces the header and cell values a spreadsheet formatter writes out.
//! Rendering to an actual file format is left to that formatter.

use crate::aggregate::{AggregateError, SessionGroup, SessionIndex};
use chrono::SecondsFormat;
use serde::Serialize;
use stocktake_protocol::ScanLine;
use thiserror::Error;

pub const EXPORT_HEADER: [&str; 10] = [
    "Device",
    "Warehouse",
    "Zone",
    "StorageBin",
    "MaterialCode",
    "MaterialDescription",
    "Barcode",
    "Batch",
    "Qty",
    "CreatedAt",
];

const FILE_STEM_PREFIX: &str = "UPC_Inventory";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,

    #[error(transparent)]
    Session(#[from] AggregateError),
}

/// Rows ready for a formatter, header first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    /// Suggested file name without extension.
    pub file_stem: String,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    fn from_lines<'l>(file_stem: String, lines: impl IntoIterator<Item = &'l ScanLine>) -> Self {
        let mut rows: Vec<Vec<String>> = vec![EXPORT_HEADER.iter().map(|h| h.to_string()).collect()];
        rows.extend(lines.into_iter().map(export_row));
        Self { file_stem, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }
}

/// Export every line, ungrouped.
pub fn export_all(index: &SessionIndex<'_>) -> Result<ExportTable, ExportError> {
    let lines = index.export_all();
    if lines.is_empty() {
        return Err(ExportError::NoData);
    }
    Ok(ExportTable::from_lines(
        format!("{}_ALL", FILE_STEM_PREFIX),
        lines,
    ))
}

/// Export the lines of one session.
pub fn export_session(index: &SessionIndex<'_>, key: &str) -> Result<ExportTable, ExportError> {
    let group = index.require(key)?;
    Ok(ExportTable::from_lines(
        export_file_stem(group),
        group.lines().iter().copied(),
    ))
}

/// `UPC_Inventory_<device>_<warehouse>_<zone>_<bin>`, with placeholders for empty parts.
pub fn export_file_stem(group: &SessionGroup<'_>) -> String {
    let loc = &group.location;
    format!(
        "{}_{}_{}_{}_{}",
        FILE_STEM_PREFIX,
        or_placeholder(&loc.device_id, "DEV"),
        or_placeholder(&loc.warehouse, "WH"),
        or_placeholder(&loc.zone, "ZONE"),
        or_placeholder(&loc.storage_bin, "BIN"),
    )
}

pub fn export_row(line: &ScanLine) -> Vec<String> {
    vec![
        line.location.device_id.clone(),
        line.location.warehouse.clone(),
        line.location.zone.clone(),
        line.location.storage_bin.clone(),
        line.material_code.clone(),
        line.material_desc.clone(),
        line.barcode.clone(),
        line.batch.clone(),
        format_qty(line.qty),
        line.created_at
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default(),
    ]
}

/// Whole quantities print without a fractional part.
pub fn format_qty(qty: f64) -> String {
    format!("{}", qty)
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
