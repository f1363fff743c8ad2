#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use school_core::{config::ConfigManager, core::store_manager::StoreManager, storage::JsonStorage};
use tempfile::TempDir;

/// Keeps temp directories alive until the test binary exits.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// A store manager and config manager rooted in a fresh directory.
pub fn setup_test_env() -> (StoreManager, ConfigManager, PathBuf) {
    setup_with_retention(3)
}

pub fn setup_with_retention(retention: usize) -> (StoreManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage =
        JsonStorage::new(Some(base.clone()), Some(retention)).expect("create json storage");
    let manager = StoreManager::new(Box::new(storage));
    let config = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (manager, config, base)
}
