use std::path::{Path, PathBuf};

use crate::core::workspace::{Workspace, CURRENT_SCHEMA_VERSION};
use crate::errors::StorageError;
use crate::storage::StorageBackend;

/// Facade coordinating the in-memory workspace, persistence, and backups.
pub struct WorkspaceManager {
    pub current: Option<Workspace>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn StorageBackend>,
}

impl WorkspaceManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn load(&mut self, name: &str) -> Result<(), StorageError> {
        let workspace = self.storage.load(name)?;
        ensure_schema_support(workspace.schema_version)?;
        self.current = Some(workspace);
        self.current_name = Some(name.to_string());
        self.current_path = None;
        Ok(())
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<(), StorageError> {
        let workspace = self.storage.load_from_path(path)?;
        ensure_schema_support(workspace.schema_version)?;
        self.current = Some(workspace);
        self.current_name = None;
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        let workspace = self
            .current
            .as_ref()
            .ok_or_else(|| StorageError::Storage("no workspace loaded".into()))?;
        if let Some(name) = self.current_name.clone() {
            self.storage.save(workspace, &name)
        } else if let Some(path) = self.current_path.clone() {
            self.storage.save_to_path(workspace, &path)
        } else {
            Err(StorageError::Storage(
                "unable to determine save target for current workspace".into(),
            ))
        }
    }

    pub fn save_as(&mut self, name: &str) -> Result<(), StorageError> {
        let workspace = self
            .current
            .as_ref()
            .ok_or_else(|| StorageError::Storage("no workspace loaded".into()))?;
        self.storage.save(workspace, name)?;
        self.current_name = Some(name.to_string());
        self.current_path = None;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<(), StorageError> {
        let workspace = self
            .current
            .as_ref()
            .ok_or_else(|| StorageError::Storage("no workspace loaded".into()))?;
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| StorageError::Storage("current workspace is unnamed".into()))?;
        self.storage.backup(workspace, name, note)
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>, StorageError> {
        self.storage.list_backups(name)
    }

    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<(), StorageError> {
        let workspace = self.storage.restore(name, backup_name)?;
        ensure_schema_support(workspace.schema_version)?;
        self.current = Some(workspace);
        self.current_name = Some(name.to_string());
        self.current_path = None;
        Ok(())
    }

    pub fn last_opened(&self) -> Result<Option<String>, StorageError> {
        self.storage.last_workspace()
    }

    pub fn record_last_opened(&self, name: Option<&str>) -> Result<(), StorageError> {
        self.storage.record_last_workspace(name)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current(&mut self, workspace: Workspace, name: Option<String>) {
        self.current = Some(workspace);
        self.current_name = name;
        self.current_path = None;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
        self.current_path = None;
    }
}

fn ensure_schema_support(schema_version: u32) -> Result<(), StorageError> {
    if schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StorageError::Storage(format!(
            "workspace schema v{} is newer than supported v{}",
            schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use std::fs;
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> WorkspaceManager {
        let storage = JsonStorage::new(Some(dir.to_path_buf()), Some(3)).unwrap();
        WorkspaceManager::new(Box::new(storage))
    }

    #[test]
    fn save_and_load_named_roundtrip() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());

        manager.set_current(Workspace::new("Demo"), None);
        manager.save_as("demo-workspace").expect("save workspace");

        manager.clear();
        manager.load("demo-workspace").expect("load workspace");
        assert_eq!(manager.current.as_ref().unwrap().name, "Demo");
        assert_eq!(manager.current_name(), Some("demo-workspace"));
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());

        let path = temp.path().join("future.json");
        let mut workspace = Workspace::new("Future");
        workspace.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(&path, serde_json::to_string(&workspace).unwrap()).unwrap();

        let err = manager
            .load_from_path(&path)
            .expect_err("future schema should fail");
        match err {
            StorageError::Storage(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn save_without_target_is_an_error() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.set_current(Workspace::new("Detached"), None);
        assert!(manager.save().is_err());
    }
}
