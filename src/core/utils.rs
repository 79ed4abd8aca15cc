use dirs::home_dir;
use std::{env, fs, path::Path, path::PathBuf};

use crate::errors::StorageError;

const DEFAULT_DIR_NAME: &str = ".splitmatch";
const WORKSPACE_DIR: &str = "workspaces";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const STATE_FILE: &str = "state.json";

/// Returns the application data directory, defaulting to `~/.splitmatch`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("SPLITMATCH_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn resolve_base(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(app_data_dir)
}

/// Directory holding the managed workspace files.
pub fn workspaces_dir_in(base: &Path) -> PathBuf {
    base.join(WORKSPACE_DIR)
}

/// Base directory for backup snapshots.
pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join("config.json")
}

/// Path to the shared state file (tracking the last opened workspace).
pub fn state_file_in(base: &Path) -> PathBuf {
    base.join(STATE_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
