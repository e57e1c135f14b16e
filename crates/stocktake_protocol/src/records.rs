//! Reading and writing scan line collections.
//!
//! Two layouts are accepted on input: a JSON array of documents (what the
//! store's export produces) or JSON-lines, one document per line. Output is
//! always a pretty-printed array.

use crate::error::{ProtocolError, Result};
use crate::types::ScanLine;
use std::path::Path;

/// Parse a collection of scan lines, preserving document order.
pub fn parse_lines(content: &str) -> Result<Vec<ScanLine>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(ProtocolError::InvalidDocument);
    }

    let mut lines = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let line = serde_json::from_str(raw).map_err(|source| ProtocolError::InvalidRecord {
            line: idx + 1,
            source,
        })?;
        lines.push(line);
    }
    Ok(lines)
}

pub fn read_lines(path: &Path) -> Result<Vec<ScanLine>> {
    let content = std::fs::read_to_string(path).map_err(|source| ProtocolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_lines(&content)
}

pub fn write_lines(path: &Path, lines: &[ScanLine]) -> Result<()> {
    let mut content = serde_json::to_string_pretty(lines).map_err(ProtocolError::Encode)?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| ProtocolError::Io {
        path: path.to_path_buf(),
        source,
    })
}
