use std::path::PathBuf;

use tracing::{info, warn};

use crate::errors::{Result, SchoolError};
use crate::records::{SchoolRecords, CURRENT_SCHEMA_VERSION};
use crate::storage::{BackupInfo, StorageBackend};

/// Outcome of opening a named store.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub name: String,
    pub warnings: Vec<String>,
    pub schema_version: u8,
}

/// Owns the active record set and mediates every load and save through the backend.
///
/// Nothing is written implicitly: callers decide when to `save`.
pub struct StoreManager {
    current: Option<SchoolRecords>,
    current_name: Option<String>,
    dirty: bool,
    storage: Box<dyn StorageBackend>,
}

impl StoreManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            dirty: false,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current(&self) -> Option<&SchoolRecords> {
        self.current.as_ref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn records(&self) -> Result<&SchoolRecords> {
        self.current.as_ref().ok_or(SchoolError::NotLoaded)
    }

    /// Runs a mutation against the loaded records and marks them unsaved on success.
    pub fn with_records_mut<T, E>(
        &mut self,
        f: impl FnOnce(&mut SchoolRecords) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<SchoolError>,
    {
        let records = self.current.as_mut().ok_or(SchoolError::NotLoaded)?;
        let value = f(records)?;
        self.dirty = true;
        Ok(value)
    }

    /// Starts a fresh, unsaved store under `name`.
    pub fn create(&mut self, name: &str) {
        self.replace(SchoolRecords::new(name), name);
        self.dirty = true;
    }

    /// Adopts an in-memory record set (e.g. fixtures) as the unsaved current store.
    pub fn adopt(&mut self, records: SchoolRecords, name: &str) {
        self.replace(records, name);
        self.dirty = true;
    }

    pub fn load(&mut self, name: &str) -> Result<LoadReport> {
        let records = self.storage.load(name)?;
        ensure_schema_support(records.schema_version)?;
        let warnings = records.warnings();
        for warning in &warnings {
            warn!(store = name, "{}", warning);
        }
        let report = LoadReport {
            name: name.to_string(),
            warnings,
            schema_version: records.schema_version,
        };
        self.replace(records, name);
        info!(store = name, "record store loaded");
        Ok(report)
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let name = self
            .current_name
            .clone()
            .ok_or(SchoolError::NotLoaded)?;
        self.save_as(&name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf> {
        let records = self.current.as_mut().ok_or(SchoolError::NotLoaded)?;
        records.name = name.to_string();
        let path = self.storage.save(records, name)?;
        self.current_name = Some(name.to_string());
        self.dirty = false;
        info!(store = name, path = %path.display(), "record store saved");
        Ok(path)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo> {
        let records = self.records()?;
        let name = self.current_name.as_deref().ok_or(SchoolError::NotLoaded)?;
        let info = self.storage.backup(records, name, note)?;
        info!(store = name, backup = %info.file_name, "backup created");
        Ok(info)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let name = self.current_name.as_deref().ok_or(SchoolError::NotLoaded)?;
        self.storage.list_backups(name)
    }

    pub fn restore(&mut self, backup_name: &str) -> Result<LoadReport> {
        let name = self
            .current_name
            .clone()
            .ok_or(SchoolError::NotLoaded)?;
        let records = self.storage.load_backup(&name, backup_name)?;
        ensure_schema_support(records.schema_version)?;
        self.storage.save(&records, &name)?;
        let report = LoadReport {
            name: name.clone(),
            warnings: records.warnings(),
            schema_version: records.schema_version,
        };
        self.replace(records, &name);
        info!(store = %name, backup = backup_name, "backup restored");
        Ok(report)
    }

    fn replace(&mut self, records: SchoolRecords, name: &str) {
        self.current = Some(records);
        self.current_name = Some(name.to_string());
        self.dirty = false;
    }
}

fn ensure_schema_support(version: u8) -> Result<()> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(SchoolError::UnsupportedSchema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(())
}
