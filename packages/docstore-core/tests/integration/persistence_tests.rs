//! Document files: save, reopen, and the load/save error paths.

use ntest::timeout;
use std::fs;
use tempfile::tempdir;

use docstore_core::document::Node;
use docstore_core::vocabulary::{ATTR_ID, ATTR_TYPE, ROOT_NODE, VERSION_NODE};
use docstore_core::{RecordStore, StoreConfig, StoreError};

use super::helpers::{member, registered_store, timestamp, Event, Member};

#[timeout(2000)]
#[test]
fn test_save_and_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("club.json");

    let mut store = registered_store();
    let mut m = member("Marcin", "Nowak");
    m.birth_date = Some(timestamp("1985-03-14T07:45:00"));
    m.event_dates = vec!["a".to_string(), "b".to_string()];
    store.add(&m).unwrap();
    store.save(&path).unwrap();

    let mut reopened = RecordStore::open(&path, StoreConfig::default()).unwrap();
    reopened.register::<Member>().unwrap();
    reopened.register::<Event>().unwrap();

    assert_eq!(reopened.get_all::<Member>().unwrap(), vec![m]);
    assert!(reopened.get_all::<Event>().unwrap().is_empty());
    assert_eq!(reopened.document(), store.document());
}

#[timeout(2000)]
#[test]
fn test_saved_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layout.json");

    let mut store = registered_store();
    let m = member("Anna", "Kowalska");
    store.add(&m).unwrap();
    store.save(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let root: Node = serde_json::from_str(&raw).unwrap();
    assert_eq!(root.name(), ROOT_NODE);
    assert_eq!(root.children()[0].name(), VERSION_NODE);

    let record = &root.child("Member").unwrap().children()[0];
    assert_eq!(record.name(), "Member");
    assert_eq!(record.attribute(ATTR_ID), Some(m.id()));

    let first_name = record.child("first_name").unwrap();
    assert_eq!(first_name.text(), "Anna");
    assert_eq!(first_name.attribute(ATTR_TYPE), Some("String"));

    let birth_date = record.child("birth_date").unwrap();
    assert_eq!(birth_date.text(), "");
    assert_eq!(birth_date.attribute(ATTR_TYPE), Some("Option"));
}

#[timeout(2000)]
#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let result = RecordStore::open(dir.path().join("absent.json"), StoreConfig::default());
    assert!(matches!(result, Err(StoreError::MissingFile { .. })));
}

#[timeout(2000)]
#[test]
fn test_open_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    fs::write(&path, "{\"name\": \"DocumentStore\", \"children\": [").unwrap();

    let result = RecordStore::open(&path, StoreConfig::default());
    assert!(matches!(result, Err(StoreError::LoadFailure { .. })));
}

#[timeout(2000)]
#[test]
fn test_save_to_invalid_paths() {
    let dir = tempdir().unwrap();
    let store = registered_store();

    assert!(matches!(
        store.save(""),
        Err(StoreError::InvalidPath { .. })
    ));
    assert!(matches!(
        store.save(dir.path().join("no").join("such").join("dir.json")),
        Err(StoreError::InvalidPath { .. })
    ));
}

#[timeout(2000)]
#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stable.json");

    let store = registered_store();
    store.save(&path).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(store.save(dir.path()).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
