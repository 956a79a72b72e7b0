use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`SlotStore`][crate::SlotStore] and
/// [`QuickSave`][crate::QuickSave].
///
/// A failed call leaves both the directory and the catalog as they were.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid slot name: {0:?}")]
    InvalidName(String),

    #[error("Slot not found: {0}")]
    NotFound(String),

    #[error("I/O failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
