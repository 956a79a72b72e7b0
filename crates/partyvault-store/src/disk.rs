//! File helpers shared by the named and single-slot stores.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::StoreError;

/// Replace the contents of `path` with `contents`.
///
/// The data goes to a short dot-prefixed sibling first and is renamed into place
/// once flushed and synced, so `path` holds either the old or the new content.
/// On failure the sibling is removed.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    let tmp_path = temp_sibling(path).ok_or_else(|| {
        StoreError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    if let Err(e) = write_and_sync(&tmp_path, contents) {
        discard(&tmp_path);
        return Err(StoreError::io(&tmp_path, e));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        discard(&tmp_path);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// Read a whole file, mapping a missing file to [`StoreError::NotFound`]
/// carrying `label`.
pub(crate) fn read_text(path: &Path, label: &str) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(label.to_string()),
        _ => StoreError::io(path, e),
    })
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// Kept short so any target name that fits the filesystem also has a temp name
// that fits.
fn temp_sibling(path: &Path) -> Option<PathBuf> {
    path.file_name()?;
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    Some(path.with_file_name(format!(".{}-{n}.tmp", std::process::id())))
}

// The handle is dropped (closed) on every path out of this function.
fn write_and_sync(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != io::ErrorKind::NotFound
    {
        debug!(path = %path.display(), error = %e, "could not remove temporary file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_sibling_is_hidden_next_to_target() {
        let target = Path::new("/data/SavedParties/heroes.txt");
        let tmp = temp_sibling(target).unwrap();
        assert_eq!(tmp.parent(), target.parent());
        let tmp_name = tmp.file_name().unwrap().to_str().unwrap();
        assert!(tmp_name.starts_with('.'));
        assert!(tmp_name.ends_with(".tmp"));
        assert_ne!(temp_sibling(target), Some(tmp));
    }

    #[test]
    fn temp_sibling_name_does_not_grow_with_target() {
        let long = format!("/data/{}.txt", "a".repeat(250));
        let tmp = temp_sibling(Path::new(&long)).unwrap();
        assert!(tmp.file_name().unwrap().len() < 40);
    }

    #[test]
    fn write_atomically_handles_long_file_names() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join(format!("{}.txt", "b".repeat(250)));
        write_atomically(&path, "x\n").expect("write");
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn write_atomically_replaces_content_and_leaves_no_temp() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("slot.txt");

        write_atomically(&path, "first\n").expect("first write");
        write_atomically(&path, "second\n").expect("second write");

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file must not be left behind");
    }

    #[test]
    fn write_atomically_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("missing").join("slot.txt");
        let err = write_atomically(&path, "x").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn read_text_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = read_text(&dir.path().join("nope.txt"), "nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "nope"));
    }
}
