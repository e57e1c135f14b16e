//! Stock-take record types
//!
//! A scan line is the unit both surfaces agree on: the capture surface builds
//! one per confirmed scan, the store persists it as a flat document, and the
//! review surface reads the whole collection back for grouping and export.
//!
//! # Document shape
//!
//! ```text
//! { id, deviceId, warehouse, zone, storageBin, sessionKey?,
//!   materialCode, materialDesc, barcode, batch, qty, createdAt? }
//! ```
//!
//! `sessionKey` is `deviceId|warehouse|zone|storageBin`. Records written
//! before the key was stored omit it; readers derive it from the four parts.

pub mod error;
pub mod records;
pub mod types;

pub use error::{ProtocolError, Result};
pub use records::{parse_lines, read_lines, write_lines};
pub use stocktake_ids::LineId;
pub use types::{join_session_key, ScanLine, SessionLocation, SESSION_KEY_SEPARATOR};
