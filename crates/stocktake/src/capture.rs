//! Capture flow
//!
//! A handheld opens a session for one device/warehouse/zone/bin, then for
//! each scan: decode, look up master data, let the operator complete the
//! draft, and finalize it into a [`ScanLine`] for the store.
//!
//! Whether the operator confirms before saving, or accepts manual entry after
//! a catalog miss, is the caller's decision. This module only validates.

use crate::decode::{decode, DecodedScan};
use crate::master::{MaterialLookup, MaterialRecord};
use stocktake_protocol::{LineId, ScanLine, SessionLocation};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Session needs device, warehouse, zone and storage bin (missing: {missing})")]
    IncompleteSession { missing: String },

    #[error("Nothing was scanned")]
    EmptyScan,

    #[error("Scan a barcode or QR code before saving")]
    MissingBarcode,

    #[error("Material code and description are required")]
    MissingMaterial,

    #[error("Batch is required")]
    MissingBatch,

    #[error("Quantity must be a positive number (got '{0}')")]
    InvalidQuantity(String),
}

/// An open capture session on one handheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    location: SessionLocation,
    key: String,
}

impl CaptureSession {
    /// Open a session; every part is trimmed and must be non-empty.
    pub fn start(
        device_id: &str,
        warehouse: &str,
        zone: &str,
        storage_bin: &str,
    ) -> Result<Self, CaptureError> {
        let parts = [
            ("device", device_id.trim()),
            ("warehouse", warehouse.trim()),
            ("zone", zone.trim()),
            ("storage bin", storage_bin.trim()),
        ];
        let missing: Vec<&str> = parts
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CaptureError::IncompleteSession {
                missing: missing.join(", "),
            });
        }

        let location = SessionLocation::new(parts[0].1, parts[1].1, parts[2].1, parts[3].1);
        let key = location.session_key();
        info!(session = %key, "capture session started");
        Ok(Self { location, key })
    }

    pub fn location(&self) -> &SessionLocation {
        &self.location
    }

    pub fn session_key(&self) -> &str {
        &self.key
    }

    /// Decode a scan and resolve it against this session's warehouse.
    pub fn lookup<L>(&self, raw: &str, catalog: &L) -> Result<ScanOutcome, CaptureError>
    where
        L: MaterialLookup + ?Sized,
    {
        if raw.trim().is_empty() {
            return Err(CaptureError::EmptyScan);
        }
        let decoded = decode(raw);
        let material = catalog.lookup(&self.location.warehouse, &decoded.barcode);
        debug!(
            barcode = %decoded.barcode,
            batch = %decoded.batch,
            found = material.is_some(),
            "scan resolved"
        );
        Ok(ScanOutcome { decoded, material })
    }
}

/// Result of decoding one scan and consulting master data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub decoded: DecodedScan,
    pub material: Option<MaterialRecord>,
}

impl ScanOutcome {
    pub fn is_known(&self) -> bool {
        self.material.is_some()
    }
}

/// Operator-editable fields of a line being captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDraft {
    pub barcode: String,
    pub material_code: String,
    pub material_desc: String,
    pub batch: String,
    /// Quantity as typed.
    pub qty: String,
}

impl LineDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the draft from a scan outcome.
    ///
    /// A batch read from the QR payload only fills an empty batch field. On a
    /// catalog miss the material fields are cleared for manual entry.
    pub fn apply(&mut self, outcome: &ScanOutcome) {
        self.barcode = outcome.decoded.barcode.clone();

        if outcome.decoded.has_batch() && self.batch.trim().is_empty() {
            self.batch = outcome.decoded.batch.clone();
        }

        match &outcome.material {
            Some(record) => {
                self.material_code = record.material.clone();
                self.material_desc = record.description.clone();
            }
            None => {
                self.material_code.clear();
                self.material_desc.clear();
            }
        }
    }

    /// Validate the draft and build the line to persist.
    ///
    /// The line gets a fresh id, the session's location and stored key, and no
    /// timestamp; the store assigns `createdAt` on commit.
    pub fn finalize(&self, session: &CaptureSession) -> Result<ScanLine, CaptureError> {
        let barcode = self.barcode.trim();
        let material_code = self.material_code.trim();
        let material_desc = self.material_desc.trim();
        let batch = self.batch.trim();

        if barcode.is_empty() {
            return Err(CaptureError::MissingBarcode);
        }
        if material_code.is_empty() || material_desc.is_empty() {
            return Err(CaptureError::MissingMaterial);
        }
        if batch.is_empty() {
            return Err(CaptureError::MissingBatch);
        }
        let qty = parse_quantity(&self.qty)?;

        Ok(ScanLine {
            id: LineId::new(),
            location: session.location.clone(),
            session_key: Some(session.key.clone()),
            material_code: material_code.to_string(),
            material_desc: material_desc.to_string(),
            barcode: barcode.to_string(),
            batch: batch.to_string(),
            qty,
            created_at: None,
        })
    }
}

/// Parse an operator-entered quantity; it must be a positive finite number.
pub fn parse_quantity(input: &str) -> Result<f64, CaptureError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(qty) if qty.is_finite() && qty > 0.0 => Ok(qty),
        _ => Err(CaptureError::InvalidQuantity(trimmed.to_string())),
    }
}
