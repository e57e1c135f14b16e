//! Configuration for the stock-take tools
//!
//! Stored as TOML at `~/.stocktake/config.toml` (or `$STOCKTAKE_HOME`):
//!
//! ```toml
//! log_filter = "stocktake=debug"
//!
//! [[catalogs]]
//! warehouse = "M02"
//! path = "catalogs/medicine.json"
//! ```
//!
//! Relative catalog paths resolve against the directory holding the file.

use crate::master::{CatalogError, MasterCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Master-data file for one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSource {
    pub warehouse: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StocktakeConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,

    pub catalogs: Vec<CatalogSource>,
}

impl StocktakeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: StocktakeConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            for catalog in &mut config.catalogs {
                if catalog.path.is_relative() {
                    catalog.path = base.join(&catalog.path);
                }
            }
        }
        Ok(config)
    }

    /// Load an explicitly requested file, or the default file when it exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load every configured catalog.
    pub fn build_catalog(&self) -> Result<MasterCatalog, CatalogError> {
        let mut catalog = MasterCatalog::new();
        for source in &self.catalogs {
            catalog.load_warehouse(&source.warehouse, &source.path)?;
        }
        Ok(catalog)
    }
}

/// Default config path: ~/.stocktake/config.toml
pub fn default_config_path() -> PathBuf {
    stocktake_logging::stocktake_home().join("config.toml")
}
