//! Version gating when opening documents.

use ntest::timeout;
use tempfile::tempdir;

use docstore_core::document::Node;
use docstore_core::version::{DEFAULT_CURRENT_VERSION, DEFAULT_MINIMUM_VERSION};
use docstore_core::vocabulary::{ROOT_NODE, VERSION_NODE};
use docstore_core::{CompatibilityVersion, RecordStore, StoreConfig, StoreError, VersionMismatch};

fn v(major: u32, minor: u32, release: u32, revision: u32) -> CompatibilityVersion {
    CompatibilityVersion::new(major, minor, release, revision)
}

/// Saves an empty document stamped with `version` and opens it with `config`.
fn open_stamped(version: CompatibilityVersion, config: StoreConfig) -> Result<RecordStore, StoreError> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stamped.json");

    RecordStore::new(StoreConfig::default().with_current_version(version))
        .save(&path)
        .unwrap();

    RecordStore::open(&path, config)
}

#[timeout(2000)]
#[test]
fn test_default_versions() {
    let store = RecordStore::default();
    assert_eq!(store.current_version(), v(2, 0, 0, 0));
    assert_eq!(store.minimum_version(), v(1, 0, 0, 0));
    assert_eq!(DEFAULT_CURRENT_VERSION, v(2, 0, 0, 0));
    assert_eq!(DEFAULT_MINIMUM_VERSION, v(1, 0, 0, 0));
}

#[timeout(2000)]
#[test]
fn test_newer_documents_rejected() {
    for stored in [v(9, 0, 0, 0), v(2, 9, 0, 0), v(2, 0, 9, 0), v(2, 0, 0, 9)] {
        match open_stamped(stored, StoreConfig::default()) {
            Err(StoreError::VersionMismatch(VersionMismatch::Newer { stored: s, current })) => {
                assert_eq!(s, stored);
                assert_eq!(current, DEFAULT_CURRENT_VERSION);
            }
            other => panic!("expected Newer for {}, got {:?}", stored, other.map(|_| ())),
        }
    }
}

#[timeout(2000)]
#[test]
fn test_older_documents_rejected() {
    let result = open_stamped(v(0, 9, 0, 0), StoreConfig::default());
    assert!(matches!(
        result,
        Err(StoreError::VersionMismatch(VersionMismatch::Older { .. }))
    ));
}

#[timeout(2000)]
#[test]
fn test_in_range_document_accepted() {
    let store = open_stamped(v(1, 2, 3, 4), StoreConfig::default()).unwrap();
    assert_eq!(store.file_version(), Some(v(1, 2, 3, 4)));
    assert_eq!(store.current_version(), DEFAULT_CURRENT_VERSION);
}

#[timeout(2000)]
#[test]
fn test_custom_range() {
    let config = StoreConfig::default()
        .with_current_version(v(3, 3, 1, 0))
        .with_minimum_version(v(1, 5, 0, 2));

    for stored in [v(3, 3, 0, 0), v(2, 2, 0, 0), v(3, 2, 2, 0), v(3, 3, 0, 1)] {
        let store = open_stamped(stored, config.clone()).unwrap();
        assert_eq!(store.file_version(), Some(stored));
        assert_eq!(store.minimum_version(), v(1, 5, 0, 2));
    }
    assert!(open_stamped(v(1, 5, 0, 1), config.clone()).is_err());
    assert!(open_stamped(v(3, 3, 1, 1), config).is_err());
}

#[timeout(2000)]
#[test]
fn test_fresh_store_stamps_configured_version() {
    let config = StoreConfig::default().with_current_version(v(3, 0, 1, 0));
    let store = RecordStore::new(config);
    assert_eq!(store.file_version(), Some(v(3, 0, 1, 0)));
}

#[timeout(2000)]
#[test]
fn test_unversioned_and_malformed_documents_rejected() {
    let root = Node::new(ROOT_NODE);
    assert!(matches!(
        RecordStore::from_document(root, StoreConfig::default()),
        Err(StoreError::VersionMismatch(VersionMismatch::NoVersion))
    ));

    let mut root = Node::new(ROOT_NODE);
    let mut marker = Node::new(VERSION_NODE);
    marker.set_attribute("Major", "two");
    root.push(marker);
    assert!(matches!(
        RecordStore::from_document(root, StoreConfig::default()),
        Err(StoreError::VersionMismatch(VersionMismatch::NoVersion))
    ));
}
