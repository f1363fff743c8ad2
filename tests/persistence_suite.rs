mod common;

use common::{setup_test_env, setup_with_retention};
use school_core::config::Config;
use school_core::errors::SchoolError;
use school_core::grading::ScoreComponents;
use school_core::records::{fixtures::demo_records, SchoolRecords, Term, CURRENT_SCHEMA_VERSION};
use school_core::storage::json_backend::{load_records_from_path, save_records_to_path};

#[test]
fn saved_store_reloads_with_identical_content() {
    let (mut manager, _config, base) = setup_test_env();
    manager.adopt(demo_records(), "greenfield");
    let path = manager.save().unwrap();
    assert!(path.starts_with(&base));

    let (mut other, _, _) = setup_test_env();
    let original = manager.records().unwrap().clone();
    let copy = base.join("copy.json");
    save_records_to_path(&original, &copy).unwrap();
    let reloaded = load_records_from_path(&copy).unwrap();
    assert_eq!(reloaded.students, original.students);
    assert_eq!(reloaded.payments, original.payments);
    assert_eq!(reloaded.scores, original.scores);
    assert!(other.load("greenfield").is_err());
}

#[test]
fn stored_marks_are_clamped_when_loaded() {
    let (mut manager, _config, base) = setup_test_env();
    manager.adopt(demo_records(), "tampered");
    let path = manager.save().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&text).unwrap();
    json["scores"][0]["components"]["exam"] = serde_json::json!(95);
    std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

    manager.load("tampered").unwrap();
    let records = manager.records().unwrap();
    let first = &records.scores[0];
    assert_eq!(first.components.exam(), 60);
    assert!(first.evaluated().total <= 100);
    assert!(base.join("stores").exists());
}

#[test]
fn backups_are_pruned_to_retention() {
    let (mut manager, _config, _base) = setup_with_retention(3);
    manager.adopt(demo_records(), "demo");
    manager.save().unwrap();
    for note in ["first", "second", "third", "fourth"] {
        manager.backup(Some(note)).unwrap();
    }
    let backups = manager.list_backups().unwrap();
    assert_eq!(backups.len(), 3);
    assert!(backups.iter().all(|b| !b.file_name.contains("first")));
    assert!(backups.iter().all(|b| b.file_name.starts_with("demo_")));
}

#[test]
fn restore_brings_back_snapshot_contents() {
    let (mut manager, _config, _base) = setup_test_env();
    manager.adopt(demo_records(), "demo");
    manager.save().unwrap();
    let snapshot = manager.backup(Some("before term")).unwrap();

    manager
        .with_records_mut(|records| {
            records.scores.clear();
            Ok::<_, SchoolError>(())
        })
        .unwrap();
    manager.save().unwrap();
    assert!(manager.records().unwrap().scores.is_empty());

    let report = manager.restore(&snapshot.file_name).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(manager.records().unwrap().scores.len(), 10);
    assert!(!manager.is_dirty());
}

#[test]
fn dangling_references_surface_as_warnings() {
    let (mut manager, _config, _base) = setup_test_env();
    let mut records = demo_records();
    records.upsert_score(school_core::records::ScoreRecord::new(
        "STU-0999",
        "Mathematics",
        Term::First,
        ScoreComponents::default(),
    ));
    manager.adopt(records, "broken");
    manager.save().unwrap();
    let report = manager.load("broken").unwrap();
    assert_eq!(report.schema_version, CURRENT_SCHEMA_VERSION);
    assert!(report.warnings.iter().any(|w| w.contains("STU-0999")));
}

#[test]
fn empty_store_round_trips() {
    let (mut manager, _config, _base) = setup_test_env();
    manager.create("fresh");
    assert!(manager.is_dirty());
    manager.save().unwrap();
    manager.load("fresh").unwrap();
    let records: &SchoolRecords = manager.records().unwrap();
    assert!(records.students.is_empty());
    assert_eq!(manager.storage().list_stores().unwrap(), vec!["fresh".to_string()]);
}

#[test]
fn config_remembers_last_store() {
    let (_manager, config_manager, _base) = setup_test_env();
    let config = Config {
        last_opened_store: Some("demo".into()),
        default_branch: Some("BR-0001".into()),
        ..Config::default()
    };
    config_manager.save(&config).unwrap();
    assert_eq!(config_manager.load().unwrap(), config);
}
