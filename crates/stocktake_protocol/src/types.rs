//! Scan line and session location types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use stocktake_ids::LineId;

/// Separator between the four parts of a session key.
pub const SESSION_KEY_SEPARATOR: char = '|';

/// Join the four location parts into a session key.
///
/// Order is fixed: device, warehouse, zone, bin. Empty parts stay empty, so
/// `("", "M02", "", "")` becomes `"|M02||"`.
pub fn join_session_key(device_id: &str, warehouse: &str, zone: &str, storage_bin: &str) -> String {
    let mut key = String::with_capacity(
        device_id.len() + warehouse.len() + zone.len() + storage_bin.len() + 3,
    );
    key.push_str(device_id);
    key.push(SESSION_KEY_SEPARATOR);
    key.push_str(warehouse);
    key.push(SESSION_KEY_SEPARATOR);
    key.push_str(zone);
    key.push(SESSION_KEY_SEPARATOR);
    key.push_str(storage_bin);
    key
}

/// Where and by whom a line was scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionLocation {
    pub device_id: String,
    pub warehouse: String,
    pub zone: String,
    pub storage_bin: String,
}

impl SessionLocation {
    pub fn new(
        device_id: impl Into<String>,
        warehouse: impl Into<String>,
        zone: impl Into<String>,
        storage_bin: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            warehouse: warehouse.into(),
            zone: zone.into(),
            storage_bin: storage_bin.into(),
        }
    }

    pub fn session_key(&self) -> String {
        join_session_key(&self.device_id, &self.warehouse, &self.zone, &self.storage_bin)
    }
}

impl fmt::Display for SessionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} • {} • {} • {}",
            self.device_id, self.warehouse, self.zone, self.storage_bin
        )
    }
}

/// One persisted scan, as stored by the external record store.
///
/// Lines are never edited in place. A change produces a new `ScanLine` with
/// the same `id`, which the store writes over the old document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLine {
    pub id: LineId,
    #[serde(flatten)]
    pub location: SessionLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    #[serde(default)]
    pub material_code: String,
    #[serde(default)]
    pub material_desc: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ScanLine {
    /// Grouping key for this line.
    ///
    /// The stored key wins when present and non-empty; otherwise the key is
    /// derived from the line's own location fields.
    pub fn session_key(&self) -> Cow<'_, str> {
        match self.session_key.as_deref() {
            Some(key) if !key.is_empty() => Cow::Borrowed(key),
            _ => Cow::Owned(self.location.session_key()),
        }
    }

    pub fn is_committed(&self) -> bool {
        self.created_at.is_some()
    }
}
