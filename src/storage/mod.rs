pub mod json_backend;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{errors::Result, records::SchoolRecords};

/// A snapshot file kept for a named store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub file_name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}

/// Persistence for named record stores and their snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, records: &SchoolRecords, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<SchoolRecords>;
    fn exists(&self, name: &str) -> bool;
    fn list_stores(&self) -> Result<Vec<String>>;
    fn backup(&self, records: &SchoolRecords, name: &str, note: Option<&str>) -> Result<BackupInfo>;
    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>>;
    /// Reads a snapshot of `name` without touching the live store.
    fn load_backup(&self, name: &str, backup_name: &str) -> Result<SchoolRecords>;
}

pub use json_backend::JsonStorage;
