//! Stock-take scan engine
//!
//! Decodes scanner payloads into product codes and batches, and groups stored
//! scan lines into sessions for review and export. Everything here is pure
//! data in, data out; persistence and rendering belong to the caller.

pub mod aggregate;
pub mod capture;
pub mod config;
pub mod decode;
pub mod export;
pub mod master;
pub mod review;

pub use aggregate::{aggregate, AggregateError, SessionGroup, SessionIndex, SessionSummary};
pub use capture::{CaptureError, CaptureSession, LineDraft, ScanOutcome};
pub use config::{CatalogSource, ConfigError, StocktakeConfig};
pub use decode::{decode, decode_detailed, DecodeDetail, DecodedScan, ScanKind};
pub use export::{export_all, export_session, ExportError, ExportTable, EXPORT_HEADER};
pub use master::{CatalogError, MasterCatalog, MaterialLookup, MaterialRecord};
pub use review::{apply_edit, LineEdit, LineSet, ReviewError};
pub use stocktake_protocol::{LineId, ScanLine, SessionLocation};
