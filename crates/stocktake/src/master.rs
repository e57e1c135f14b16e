//! Master-data lookup
//!
//! Each warehouse has its own catalog mapping a product code to the material
//! number and description. A miss is an ordinary outcome: the capture flow
//! falls back to manual entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material: String,
    pub description: String,
}

/// Resolves a decoded product code against a warehouse's master data.
pub trait MaterialLookup {
    fn lookup(&self, warehouse: &str, barcode: &str) -> Option<MaterialRecord>;
}

/// In-memory catalogs, one per warehouse code.
#[derive(Debug, Clone, Default)]
pub struct MasterCatalog {
    warehouses: HashMap<String, HashMap<String, MaterialRecord>>,
}

impl MasterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_warehouse(
        &mut self,
        warehouse: impl Into<String>,
        records: HashMap<String, MaterialRecord>,
    ) {
        self.warehouses.insert(warehouse.into(), records);
    }

    /// Load a warehouse catalog from a JSON object of `barcode -> record`.
    pub fn load_warehouse(&mut self, warehouse: &str, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: HashMap<String, MaterialRecord> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = records.len();
        info!(warehouse, count, path = %path.display(), "loaded master catalog");
        self.warehouses.insert(warehouse.to_string(), records);
        Ok(count)
    }

    pub fn warehouses(&self) -> impl Iterator<Item = &str> + '_ {
        self.warehouses.keys().map(String::as_str)
    }

    /// Number of records known for a warehouse; unknown warehouses have none.
    pub fn record_count(&self, warehouse: &str) -> usize {
        self.warehouses.get(warehouse).map_or(0, HashMap::len)
    }
}

impl MaterialLookup for MasterCatalog {
    fn lookup(&self, warehouse: &str, barcode: &str) -> Option<MaterialRecord> {
        let found = self
            .warehouses
            .get(warehouse)
            .and_then(|records| records.get(barcode))
            .cloned();
        if found.is_none() {
            debug!(warehouse, barcode, "no master record");
        }
        found
    }
}
