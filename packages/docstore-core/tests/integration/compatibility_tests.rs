//! Documents written by other schema revisions, and the field type grammar.

use std::collections::{BTreeMap, HashMap};

use docstore_core::vocabulary::{ATTR_ID, ATTR_TYPE};
use docstore_core::{record, record_enum, Node, RecordStore, StoreConfig, StoreError};

use super::helpers::{member, registered_store, Member};

record_enum! {
    pub enum Weekday {
        Monday = 1,
        Tuesday = 2,
        Sunday = 7,
    }
}

record! {
    pub struct Schedule {
        pub by_day: BTreeMap<Weekday, i32>,
        pub flags: HashMap<i32, Option<bool>>,
        pub answers: Vec<Option<bool>>,
        pub slots: [Option<u8>; 3],
        pub first_day: Weekday,
        pub maybe_day: Option<Weekday>,
    }
}

record! {
    pub struct Matrix {
        pub rows: Vec<Vec<i32>>,
    }
}

record! {
    pub struct Lookup {
        pub by_key: BTreeMap<Option<i32>, i32>,
    }
}

record! {
    pub struct Alias {
        pub nickname: Option<String>,
    }
}

record! {
    pub struct AliasList {
        pub aliases: Vec<Option<String>>,
    }
}

/// Registers `Member` on a store wrapping `root`.
fn reopen(root: Node) -> RecordStore {
    let mut store = RecordStore::from_document(root, StoreConfig::default()).unwrap();
    store.register::<Member>().unwrap();
    store
}

fn first_member_node(root: &mut Node) -> &mut Node {
    root.child_mut("Member")
        .unwrap()
        .children_mut()
        .next()
        .unwrap()
}

#[test]
fn test_unknown_field_is_ignored() {
    let mut store = registered_store();
    let m = member("Anna", "Kowalska");
    store.add(&m).unwrap();

    let mut root = store.document().clone();
    let mut extra = Node::with_text("nickname", "Ania");
    extra.set_attribute(ATTR_TYPE, "String");
    first_member_node(&mut root).push(extra);

    let loaded = reopen(root).get::<Member>(m.id()).unwrap().unwrap();
    assert_eq!(loaded, m);
}

#[test]
fn test_tag_drift_resets_field() {
    let mut store = registered_store();
    let mut m = member("Anna", "Kowalska");
    m.balance = 99.5;
    store.add(&m).unwrap();

    let mut root = store.document().clone();
    let mut drifted = Node::with_text("balance", "99.5");
    drifted.set_attribute(ATTR_TYPE, "i32");
    let record = first_member_node(&mut root);
    record.remove_children_where(|c| c.name() == "balance");
    record.push(drifted);

    let loaded = reopen(root).get::<Member>(m.id()).unwrap().unwrap();
    assert_eq!(loaded.balance, 0.0);
    assert_eq!(loaded.first_name, "Anna");
}

#[test]
fn test_missing_fields_use_defaults() {
    let mut root = RecordStore::default().document().clone();
    let mut section = Node::new("Member");
    let mut record = Node::new("Member");
    record.set_attribute(ATTR_ID, "0123456789abcdef0123456789abcdef");
    let mut surname = Node::with_text("surname", "Nowak");
    surname.set_attribute(ATTR_TYPE, "String");
    record.push(surname);
    section.push(record);
    root.push(section);

    let loaded = reopen(root)
        .get::<Member>("0123456789abcdef0123456789abcdef")
        .unwrap()
        .unwrap();
    assert_eq!(loaded.surname, "Nowak");
    assert_eq!(loaded.first_name, "");
    assert_eq!(loaded.birth_date, None);
    assert!(loaded.event_dates.is_empty());
}

#[test]
fn test_unparsable_scalar_is_conversion_error() {
    let mut store = registered_store();
    let m = member("Anna", "Kowalska");
    store.add(&m).unwrap();

    let mut root = store.document().clone();
    let record = first_member_node(&mut root);
    record.remove_children_where(|c| c.name() == "balance");
    let mut broken = Node::with_text("balance", "a lot");
    broken.set_attribute(ATTR_TYPE, "f64");
    record.push(broken);

    match reopen(root).get::<Member>(m.id()) {
        Err(StoreError::Conversion {
            record_type,
            field,
            raw,
            ..
        }) => {
            assert_eq!(record_type, "Member");
            assert_eq!(field, "balance");
            assert_eq!(raw, "a lot");
        }
        other => panic!("expected Conversion, got {:?}", other),
    }
}

#[test]
fn test_enum_keys_and_optional_elements() {
    let mut store = RecordStore::default();
    store.register::<Schedule>().unwrap();

    let mut schedule = Schedule::new();
    schedule.by_day.insert(Weekday::Monday, 8);
    schedule.by_day.insert(Weekday::Sunday, 0);
    schedule.flags.insert(1, Some(true));
    schedule.flags.insert(2, None);
    schedule.answers = vec![None, Some(false), Some(true)];
    schedule.slots = [Some(9), None, Some(255)];
    schedule.first_day = Weekday::Tuesday;
    schedule.maybe_day = Some(Weekday::Sunday);

    store.add(&schedule).unwrap();
    let loaded = store.get::<Schedule>(schedule.id()).unwrap().unwrap();
    assert_eq!(loaded, schedule);
}

#[test]
fn test_empty_containers_and_absent_optionals() {
    let mut store = RecordStore::default();
    store.register::<Schedule>().unwrap();

    let schedule = Schedule::new();
    store.add(&schedule).unwrap();
    let loaded = store.get::<Schedule>(schedule.id()).unwrap().unwrap();
    assert_eq!(loaded, schedule);
    assert!(loaded.by_day.is_empty());
    assert_eq!(loaded.maybe_day, None);
    assert_eq!(loaded.first_day, Weekday::Monday);
}

#[test]
fn test_enum_stored_by_name_is_accepted() {
    let mut store = RecordStore::default();
    store.register::<Schedule>().unwrap();
    let schedule = Schedule::new();
    store.add(&schedule).unwrap();

    let mut root = store.document().clone();
    let record = root
        .child_mut("Schedule")
        .unwrap()
        .children_mut()
        .next()
        .unwrap();
    record.remove_children_where(|c| c.name() == "first_day");
    let mut by_name = Node::with_text("first_day", "Sunday");
    by_name.set_attribute(ATTR_TYPE, "Weekday");
    record.push(by_name);

    let mut reopened = RecordStore::from_document(root, StoreConfig::default()).unwrap();
    reopened.register::<Schedule>().unwrap();
    let loaded = reopened.get::<Schedule>(schedule.id()).unwrap().unwrap();
    assert_eq!(loaded.first_day, Weekday::Sunday);
}

#[test]
fn test_grammar_rejections() {
    let mut store = RecordStore::default();
    assert!(matches!(
        store.register::<Matrix>(),
        Err(StoreError::InvalidFieldShape { .. })
    ));
    assert!(matches!(
        store.register::<Lookup>(),
        Err(StoreError::InvalidFieldShape { .. })
    ));
    assert!(store.register::<Schedule>().is_ok());
}

#[test]
fn test_optional_strings_are_rejected() {
    // Absent and empty optional strings would both be stored as empty text.
    let mut store = RecordStore::default();
    match store.register::<Alias>() {
        Err(StoreError::InvalidFieldShape { field, .. }) => assert_eq!(field, "nickname"),
        other => panic!("expected InvalidFieldShape, got {:?}", other),
    }
    match store.register::<AliasList>() {
        Err(StoreError::InvalidFieldShape { field, .. }) => assert_eq!(field, "aliases"),
        other => panic!("expected InvalidFieldShape, got {:?}", other),
    }

    // A section edited in by hand still refuses the write.
    let mut root = store.document().clone();
    root.push(Node::new("Alias"));
    let mut store = RecordStore::from_document(root, StoreConfig::default()).unwrap();
    let mut alias = Alias::new();
    alias.nickname = Some(String::new());
    assert!(matches!(
        store.add(&alias),
        Err(StoreError::InvalidFieldShape { .. })
    ));
    assert!(!store.document().child("Alias").unwrap().has_children());
}
