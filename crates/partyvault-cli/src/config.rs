//! Configuration Vault – reads/writes `~/.partyvault/config.toml`.

use partyvault_store::StorageLayout;
use partyvault_store::layout::{DEFAULT_QUICK_SAVE_FILE, DEFAULT_SAVE_DIR, DEFAULT_SLOT_EXTENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user configuration stored in `~/.partyvault/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one file per named party.
    #[serde(default = "default_save_dir")]
    pub save_dir: String,

    /// Extension that marks a file in `save_dir` as a party slot.
    #[serde(default = "default_slot_extension")]
    pub slot_extension: String,

    /// File used by `/quicksave` and `/quickload`.
    #[serde(default = "default_quick_save_file")]
    pub quick_save_file: String,
}

fn default_save_dir() -> String {
    DEFAULT_SAVE_DIR.to_string()
}
fn default_slot_extension() -> String {
    DEFAULT_SLOT_EXTENSION.to_string()
}
fn default_quick_save_file() -> String {
    DEFAULT_QUICK_SAVE_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            slot_extension: default_slot_extension(),
            quick_save_file: default_quick_save_file(),
        }
    }
}

impl Config {
    /// The storage paths this configuration describes.
    pub fn layout(&self) -> StorageLayout {
        StorageLayout {
            save_dir: PathBuf::from(&self.save_dir),
            slot_extension: self.slot_extension.clone(),
            quick_save_file: PathBuf::from(&self.quick_save_file),
        }
    }
}

/// Return the path to `~/.partyvault/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".partyvault").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load the config from a specific path, without environment overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Load the config, falling back to defaults (with env overrides applied)
/// when the file is missing or unreadable.
pub fn load_or_default() -> Config {
    match load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) | Err(_) => {
            let mut cfg = Config::default();
            apply_env_overrides(&mut cfg);
            cfg
        }
    }
}

/// Apply `PARTYVAULT_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `PARTYVAULT_SAVE_DIR` | `save_dir` |
/// | `PARTYVAULT_SLOT_EXTENSION` | `slot_extension` |
/// | `PARTYVAULT_QUICK_SAVE` | `quick_save_file` |
///
/// Empty values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("PARTYVAULT_SAVE_DIR")
        && !v.trim().is_empty()
    {
        cfg.save_dir = v;
    }
    if let Ok(v) = std::env::var("PARTYVAULT_SLOT_EXTENSION")
        && !v.trim().is_empty()
    {
        cfg.slot_extension = v.trim().trim_start_matches('.').to_string();
    }
    if let Ok(v) = std::env::var("PARTYVAULT_QUICK_SAVE")
        && !v.trim().is_empty()
    {
        cfg.quick_save_file = v;
    }
}

/// Save the config to disk, creating `~/.partyvault/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.save_dir, "SavedParties");
        assert_eq!(loaded.slot_extension, "txt");
        assert_eq!(loaded.quick_save_file, "SaveDateParty.txt");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "slot_extension = \"party\"\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.slot_extension, "party");
        assert_eq!(loaded.save_dir, "SavedParties");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "save_dir = [").unwrap();
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn config_path_points_to_partyvault_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".partyvault"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn layout_mirrors_config() {
        let cfg = Config {
            save_dir: "/var/parties".to_string(),
            slot_extension: "party".to_string(),
            quick_save_file: "/var/quick.party".to_string(),
        };
        let layout = cfg.layout();
        assert_eq!(layout.save_dir, PathBuf::from("/var/parties"));
        assert_eq!(layout.slot_extension, "party");
        assert_eq!(layout.quick_save_file, PathBuf::from("/var/quick.party"));
    }

    #[test]
    fn apply_env_overrides_changes_save_dir() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("PARTYVAULT_SAVE_DIR", "/tmp/parties") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.save_dir, "/tmp/parties");
        unsafe { std::env::remove_var("PARTYVAULT_SAVE_DIR") };
    }

    #[test]
    fn apply_env_overrides_strips_extension_dot() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("PARTYVAULT_SLOT_EXTENSION", ".sav") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.slot_extension, "sav");
        unsafe { std::env::remove_var("PARTYVAULT_SLOT_EXTENSION") };
    }

    #[test]
    fn apply_env_overrides_ignores_empty_quick_save() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("PARTYVAULT_QUICK_SAVE", "  ") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.quick_save_file, "SaveDateParty.txt");
        unsafe { std::env::remove_var("PARTYVAULT_QUICK_SAVE") };
    }
}
