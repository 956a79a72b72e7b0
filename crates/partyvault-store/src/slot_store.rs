//! Named Slot Store.
//!
//! Persists each named party to its own file, `<dir>/<name>.<extension>`, and
//! keeps an in-memory catalog of slot names.  After [`SlotStore::open`] the
//! catalog always equals the set of slot files in the directory: `save` and
//! `delete` update the file first and touch the catalog only once the file
//! operation has succeeded.
//!
//! The directory is the source of truth.  [`SlotStore::initialize`] rebuilds
//! the catalog from a fresh scan, which is also how a process recovers after
//! an unclean shutdown.
//!
//! The store assumes it is the only writer of its directory.
//!
//! # Example
//!
//! ```rust
//! use partyvault_store::SlotStore;
//! use partyvault_types::PartyCharacter;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = SlotStore::open(dir.path(), "txt").unwrap();
//!
//! let party = vec![PartyCharacter::new(1, 100, 20, 8, 6, 4).with_equipment([3])];
//! store.save("heroes", &party).unwrap();
//! assert_eq!(store.list_names(), ["heroes"]);
//!
//! let loaded = store.load("heroes").unwrap();
//! assert_eq!(loaded.slot.records, party);
//!
//! store.delete("heroes").unwrap();
//! assert!(store.list_names().is_empty());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use partyvault_types::{DecodeWarning, PartyCharacter, PartySlot};
use tracing::{debug, info, warn};

use crate::codec::{decode_slot, encode_slot};
use crate::disk;
use crate::error::StoreError;

/// A slot read back from disk together with anything the decoder skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSlot {
    pub slot: PartySlot,
    pub warnings: Vec<DecodeWarning>,
}

/// Directory-backed store of named parties.
#[derive(Debug)]
pub struct SlotStore {
    dir: PathBuf,
    extension: String,
    catalog: Vec<String>,
}

impl SlotStore {
    /// Open the store rooted at `dir`, treating files ending in `.extension`
    /// as slots.  Creates `dir` when missing and builds the catalog.
    pub fn open(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Result<Self, StoreError> {
        let extension: String = extension.into();
        let mut store = Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            catalog: Vec::new(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the directory exists and replace the catalog with the slot
    /// names currently on disk.
    ///
    /// Any previous in-memory catalog is discarded.  Subdirectories, files
    /// with another extension and dot-prefixed (temporary) files are ignored.
    /// On error the previous catalog is kept.
    pub fn initialize(&mut self) -> Result<&[String], StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))? {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = self.slot_name_of(&path) {
                names.push(name);
            }
        }
        names.sort();

        info!(
            dir = %self.dir.display(),
            slots = names.len(),
            "slot catalog rebuilt from disk"
        );
        self.catalog = names;
        Ok(&self.catalog)
    }

    /// Slot names currently known.  Scanned names are sorted; names created
    /// later are appended in creation order.
    pub fn list_names(&self) -> &[String] {
        &self.catalog
    }

    /// Whether `name` is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.catalog.iter().any(|n| n == name)
    }

    /// The storage directory.
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// The slot file extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the file backing slot `name`.
    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.extension))
    }

    /// Write `records` as slot `name`, replacing any previous content, and
    /// add `name` to the catalog if it is new.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidName`] for an empty or whitespace-only name, or
    /// one that is not a plain file name.  [`StoreError::Io`] when the write
    /// fails; the catalog is not changed and the call can be retried.
    pub fn save(&mut self, name: &str, records: &[PartyCharacter]) -> Result<(), StoreError> {
        validate_name(name)?;
        let path = self.slot_path(name);
        disk::write_atomically(&path, &encode_slot(records))?;

        if !self.contains(name) {
            self.catalog.push(name.to_string());
        }
        info!(slot = %name, records = records.len(), path = %path.display(), "party saved");
        Ok(())
    }

    /// Read and decode slot `name`.
    ///
    /// Only the directory is consulted, so a slot file that is missing from
    /// the catalog still loads.  Decode warnings are logged and returned.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no slot file exists for `name`;
    /// [`StoreError::Io`] when it exists but cannot be read.
    pub fn load(&self, name: &str) -> Result<LoadedSlot, StoreError> {
        if validate_name(name).is_err() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let path = self.slot_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if !self.contains(name) {
            debug!(slot = %name, "loading slot that is not in the catalog");
        }

        let decoded = decode_slot(&disk::read_text(&path, name)?);
        for warning in &decoded.warnings {
            warn!(slot = %name, %warning, "skipped malformed data while loading");
        }
        info!(
            slot = %name,
            records = decoded.records.len(),
            skipped = decoded.warnings.len(),
            "party loaded"
        );

        Ok(LoadedSlot {
            slot: PartySlot {
                name: name.to_string(),
                records: decoded.records,
            },
            warnings: decoded.warnings,
        })
    }

    /// Remove slot `name` from disk, then from the catalog.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidName`] under the same rules as [`SlotStore::save`];
    /// [`StoreError::NotFound`] when no slot file exists; [`StoreError::Io`]
    /// when the file cannot be removed, in which case the catalog keeps
    /// `name`.
    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        let path = self.slot_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::io(&path, e),
        })?;

        self.catalog.retain(|n| n != name);
        info!(slot = %name, path = %path.display(), "party deleted");
        Ok(())
    }

    // Inverse of `slot_path`: the whole configured extension is stripped,
    // even when it contains dots itself.
    fn slot_name_of(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(self.extension.as_str())?.strip_suffix('.')?;
        validate_name(stem).ok()?;
        Some(stem.to_string())
    }
}

/// Check that `name` can be used as a slot file's base name.
///
/// Rejects empty and whitespace-only names, path separators, NUL bytes and a
/// leading `.` (reserved for temporary files).
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if invalid {
        Err(StoreError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
