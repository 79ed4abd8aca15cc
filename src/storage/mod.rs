pub mod json_backend;

use std::path::Path;

use crate::{core::workspace::Workspace, errors::StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstraction over persistence backends capable of storing workspaces.
pub trait StorageBackend: Send + Sync {
    fn save(&self, workspace: &Workspace, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Workspace>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, workspace: &Workspace, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Workspace>;
    fn last_workspace(&self) -> Result<Option<String>>;
    fn record_last_workspace(&self, name: Option<&str>) -> Result<()>;

    /// Ad-hoc file operations; defaults forward to plain JSON files.
    fn save_to_path(&self, workspace: &Workspace, path: &Path) -> Result<()> {
        json_backend::save_workspace_to_path(workspace, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Workspace> {
        json_backend::load_workspace_from_path(path)
    }
}

pub use json_backend::JsonStorage;
