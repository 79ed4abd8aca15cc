use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{utils, workspace::Workspace},
    errors::StorageError,
};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    workspaces_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = utils::resolve_base(root);
        utils::ensure_dir(&app_root)?;
        let workspaces_dir = utils::workspaces_dir_in(&app_root);
        let backups_dir = utils::backups_dir_in(&app_root);
        utils::ensure_dir(&workspaces_dir)?;
        utils::ensure_dir(&backups_dir)?;
        let state_file = utils::state_file_in(&app_root);
        Ok(Self {
            root: app_root,
            workspaces_dir,
            backups_dir,
            state_file,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn workspace_path(&self, name: &str) -> PathBuf {
        self.workspaces_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn write_backup_file(
        &self,
        workspace: &Workspace,
        name: &str,
        note: Option<&str>,
    ) -> Result<()> {
        let dir = self.backup_dir(name);
        utils::ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = dir.join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let json = serde_json::to_string_pretty(workspace)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        utils::ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        let backup_path = dir.join(&backup_name);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, workspace: &Workspace, name: &str) -> Result<()> {
        let path = self.workspace_path(name);
        if let Some(parent) = path.parent() {
            utils::ensure_dir(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let json = serde_json::to_string_pretty(workspace)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Workspace> {
        let path = self.workspace_path(name);
        load_workspace_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|stem| stem.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            entries.push(file_name);
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn backup(&self, workspace: &Workspace, name: &str, note: Option<&str>) -> Result<()> {
        self.write_backup_file(workspace, name, note)
    }

    fn last_workspace(&self) -> Result<Option<String>> {
        let state = self.read_state()?;
        Ok(state.last_workspace)
    }

    fn record_last_workspace(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_workspace = name.map(canonical_name);
        let data = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &data)?;
        Ok(())
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Workspace> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(StorageError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let target = self.workspace_path(name);
        fs::copy(&backup_path, &target)?;
        load_workspace_from_path(&target)
    }
}

pub fn save_workspace_to_path(workspace: &Workspace, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        utils::ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(workspace)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_workspace_from_path(path: &Path) -> Result<Workspace> {
    let data = fs::read_to_string(path)?;
    let workspace: Workspace = serde_json::from_str(&data)?;
    Ok(workspace)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_workspace: Option<String>,
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "workspace".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(parts.len() - 2)?;
    let time_part = parts.last()?;
    if !is_digits(date_part, 8) || !time_part.ends_with(".json") {
        return None;
    }
    let time_digits = &time_part[..time_part.len() - 5];
    if !is_digits(time_digits, 4) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_digits);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        utils::ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
