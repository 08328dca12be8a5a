//! Snapshot persistence for the product registry
//!
//! State is written as JSON. Saves go through a temporary sibling file and
//! a rename so a crash never leaves a half-written snapshot behind.

use crate::errors::StorageError;
use prodreg_types::{Amount, Principal, Product, ProductId, ProductUpdate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything needed to rebuild a registry. The hash index is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub next_product_id: ProductId,
    pub max_products: u64,
    pub registration_fee: Amount,
    pub authority_contract: Option<Principal>,
    pub products: BTreeMap<ProductId, Product>,
    pub product_updates: BTreeMap<ProductId, ProductUpdate>,
}

/// JSON file store for snapshots and other persisted state.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored value; `None` if nothing has been saved yet.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_slice(&data)?;
        debug!(target: "registry::storage", path = %self.path.display(), "state loaded");
        Ok(Some(value))
    }

    /// Atomically replace the stored value.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(value)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        debug!(target: "registry::storage", path = %self.path.display(), "state saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
