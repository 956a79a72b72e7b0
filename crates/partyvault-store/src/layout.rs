//! Where party files live on disk.

use std::path::PathBuf;

/// Default directory holding one file per named slot.
pub const DEFAULT_SAVE_DIR: &str = "SavedParties";
/// Default slot file extension (without the dot).
pub const DEFAULT_SLOT_EXTENSION: &str = "txt";
/// Default file used by the single-slot mode.
pub const DEFAULT_QUICK_SAVE_FILE: &str = "SaveDateParty.txt";

/// Paths used by a [`PartySession`][crate::PartySession].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    /// Directory scanned and written by the [`SlotStore`][crate::SlotStore].
    pub save_dir: PathBuf,
    /// Extension that marks a file in `save_dir` as a slot.
    pub slot_extension: String,
    /// File used by [`QuickSave`][crate::QuickSave].
    pub quick_save_file: PathBuf,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            slot_extension: DEFAULT_SLOT_EXTENSION.to_string(),
            quick_save_file: PathBuf::from(DEFAULT_QUICK_SAVE_FILE),
        }
    }
}

impl StorageLayout {
    /// Layout rooted at `root`: both the slot directory and the quick-save
    /// file are placed under it with their default names.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            save_dir: root.join(DEFAULT_SAVE_DIR),
            slot_extension: DEFAULT_SLOT_EXTENSION.to_string(),
            quick_save_file: root.join(DEFAULT_QUICK_SAVE_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_uses_relative_paths() {
        let layout = StorageLayout::default();
        assert_eq!(layout.save_dir, PathBuf::from("SavedParties"));
        assert_eq!(layout.slot_extension, "txt");
        assert_eq!(layout.quick_save_file, PathBuf::from("SaveDateParty.txt"));
    }

    #[test]
    fn rooted_layout_nests_under_root() {
        let layout = StorageLayout::rooted_at("/srv/game");
        assert_eq!(layout.save_dir, PathBuf::from("/srv/game/SavedParties"));
        assert_eq!(layout.quick_save_file, PathBuf::from("/srv/game/SaveDateParty.txt"));
    }
}
