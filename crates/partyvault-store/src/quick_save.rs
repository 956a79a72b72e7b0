//! Single-slot mode: one implicit save file, no names, no catalog.

use std::fs;
use std::path::{Path, PathBuf};

use partyvault_types::PartyCharacter;
use tracing::{info, warn};

use crate::codec::{DecodedParty, decode_slot, encode_slot};
use crate::disk;
use crate::error::StoreError;

/// Label used in [`StoreError::NotFound`] for the implicit slot.
pub const QUICK_SAVE_LABEL: &str = "quick save";

/// The single implicit save slot.
#[derive(Debug, Clone)]
pub struct QuickSave {
    path: PathBuf,
}

impl QuickSave {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a quick save currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the quick save with `records`.  The parent directory is
    /// created when missing.
    pub fn save(&self, records: &[PartyCharacter]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        disk::write_atomically(&self.path, &encode_slot(records))?;
        info!(path = %self.path.display(), records = records.len(), "quick save written");
        Ok(())
    }

    /// Read the quick save back.
    ///
    /// Returns [`StoreError::NotFound`] when nothing has been saved yet.
    pub fn load(&self) -> Result<DecodedParty, StoreError> {
        if !self.exists() {
            return Err(StoreError::NotFound(QUICK_SAVE_LABEL.to_string()));
        }
        let decoded = decode_slot(&disk::read_text(&self.path, QUICK_SAVE_LABEL)?);
        for warning in &decoded.warnings {
            warn!(path = %self.path.display(), %warning, "skipped malformed data in quick save");
        }
        info!(
            path = %self.path.display(),
            records = decoded.records.len(),
            skipped = decoded.warnings.len(),
            "quick save loaded"
        );
        Ok(decoded)
    }
}
