//! Errors raised while reading or writing scan line documents.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid scan line document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("Invalid scan line on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode scan lines: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
