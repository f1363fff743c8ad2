use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    core::utils::{canonical_name, ensure_dir, slugify_note, PathResolver},
    errors::{Result, SchoolError},
    records::SchoolRecords,
};

use super::{BackupInfo, StorageBackend};

const STORE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Stores each named record set as `stores/<name>.json`, with timestamped
/// snapshots under `backups/<name>/`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    stores_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        let stores_dir = PathResolver::store_dir_in(&root);
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&stores_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            stores_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn store_path(&self, name: &str) -> PathBuf {
        self.stores_dir
            .join(format!("{}.{}", canonical_name(name), STORE_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for stale in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(path = %stale.path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, records: &SchoolRecords, name: &str) -> Result<PathBuf> {
        let path = self.store_path(name);
        save_records_to_path(records, &path)?;
        debug!(path = %path.display(), "records saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<SchoolRecords> {
        let path = self.store_path(name);
        if !path.exists() {
            return Err(SchoolError::NotFound(format!("record store `{}`", name)));
        }
        load_records_from_path(&path)
    }

    fn exists(&self, name: &str) -> bool {
        self.store_path(name).exists()
    }

    fn list_stores(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.stores_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn backup(&self, records: &SchoolRecords, name: &str, note: Option<&str>) -> Result<BackupInfo> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let now = Utc::now();
        let mut stem = format!(
            "{}_{}",
            canonical_name(name),
            now.format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = slugify_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, STORE_EXTENSION);
        let path = dir.join(&file_name);
        let json = serde_json::to_string_pretty(records)?;
        write_file(&path, &json)?;
        self.prune_backups(name)?;
        Ok(BackupInfo {
            file_name,
            path,
            created_at: Some(now),
        })
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STORE_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(String::from)
            else {
                continue;
            };
            entries.push(BackupInfo {
                created_at: parse_backup_timestamp(&file_name),
                file_name,
                path,
            });
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(entries)
    }

    fn load_backup(&self, name: &str, backup_name: &str) -> Result<SchoolRecords> {
        if !is_plain_file_name(backup_name) {
            return Err(SchoolError::InvalidInput(format!(
                "`{}` is not a backup file name",
                backup_name
            )));
        }
        let backup_path = self.backup_dir(name).join(backup_name);
        if !backup_path.is_file() {
            return Err(SchoolError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        load_records_from_path(&backup_path)
    }
}

/// Writes to a sibling temp file and renames it over the target.
pub fn save_records_to_path(records: &SchoolRecords, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_records_from_path(path: &Path) -> Result<SchoolRecords> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

// Backup names look like `<store>_<YYYYmmdd>_<HHMMSS>[_note].json`.
fn parse_backup_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(&format!(".{}", STORE_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).rev().find_map(|pair| {
        let (date, time) = (pair[0], pair[1]);
        if !is_digits(date, 8) || !is_digits(time, 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

// Backups live directly in the store's backup directory.
fn is_plain_file_name(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '\\']) && !value.contains("..")
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

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
