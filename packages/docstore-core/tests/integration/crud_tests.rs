//! CRUD and query behaviour across several record types.

use docstore_core::{Record, StoreError};

use super::helpers::{member, registered_store, timestamp, Event, FileKind, Member, StoredFile};

#[test]
fn test_query_by_first_name() {
    let mut store = registered_store();
    let members = [
        member("Marcin", "Nowak"),
        member("Anna", "Kowalska"),
        member("Marcin", "Wisniewski"),
        member("Piotr", "Zielinski"),
    ];
    for m in &members {
        assert!(store.add(m).unwrap());
    }

    let found = store
        .query::<Member, _>(|m| m.first_name == "Marcin")
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], members[0]);
    assert_eq!(found[1], members[2]);

    // Adding an already stored record a second time fails.
    assert!(!store.add(&members[2]).unwrap());
    assert_eq!(store.get_all::<Member>().unwrap().len(), 4);
}

#[test]
fn test_full_member_round_trip() {
    let mut store = registered_store();
    let mut m = member("Marcin", "Nowak");
    m.second_name = "Jan".to_string();
    m.birth_date = Some(timestamp("1985-03-14T00:00:00"));
    m.description = "Treasurer <since 2019> & \"founder\"".to_string();
    m.balance = -1234.5678;
    m.event_dates = vec!["2020-01-01".to_string(), "2020-06-30".to_string()];
    m.files = vec![];

    store.add(&m).unwrap();
    let loaded = store.get::<Member>(m.id()).unwrap().unwrap();
    assert_eq!(loaded, m);
    assert_eq!(loaded.id(), m.id());
}

#[test]
fn test_sections_are_independent() {
    let mut store = registered_store();

    let mut event = Event::new();
    event.name = "Annual meeting".to_string();
    event.date = Some(timestamp("2021-09-01T18:00:00"));

    let mut file = StoredFile::new();
    file.name = "minutes".to_string();
    file.extension = "pdf".to_string();
    file.kind = FileKind::Archive;

    store.add(&member("Anna", "Kowalska")).unwrap();
    store.add(&event).unwrap();
    store.add(&file).unwrap();

    assert_eq!(store.get_all::<Member>().unwrap().len(), 1);
    assert_eq!(store.get_all::<Event>().unwrap(), vec![event.clone()]);
    assert_eq!(store.get_all::<StoredFile>().unwrap(), vec![file.clone()]);

    assert_eq!(store.clear::<Member>(), 1);
    assert_eq!(store.get_all::<Event>().unwrap().len(), 1);

    assert_eq!(store.clear_all(), 2);
    assert!(store.get_all::<Event>().unwrap().is_empty());
    assert!(store.has_section::<Member>());
    assert!(store.has_section::<Event>());
    assert!(store.has_section::<StoredFile>());
}

#[test]
fn test_update_preserves_identity() {
    let mut store = registered_store();
    let mut m = member("Anna", "Kowalska");
    store.add(&m).unwrap();

    m.balance = 250.0;
    m.files.push("cv.pdf".to_string());
    assert!(store.update(&m).unwrap());

    let all = store.get_all::<Member>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id(), m.id());
    assert_eq!(all[0].balance, 250.0);
    assert_eq!(all[0].files, vec!["cv.pdf".to_string()]);
}

#[test]
fn test_update_and_remove_of_unknown_record() {
    let mut store = registered_store();
    store.add(&member("Anna", "Kowalska")).unwrap();
    let before = store.document().clone();

    let stranger = member("Nobody", "Known");
    assert!(!store.update(&stranger).unwrap());
    assert!(!store.remove(&stranger));
    assert_eq!(store.document(), &before);
}

#[test]
fn test_get_by_identity() {
    let mut store = registered_store();
    let a = member("Anna", "Kowalska");
    let b = member("Piotr", "Zielinski");
    store.add(&a).unwrap();
    store.add(&b).unwrap();

    assert_eq!(store.get::<Member>(b.id()).unwrap(), Some(b.clone()));
    assert!(store.contains::<Member>(a.id()));
    assert!(store.remove(&a));
    assert!(!store.contains::<Member>(a.id()));
    assert_eq!(store.get::<Member>(a.id()).unwrap(), None);
}

#[test]
fn test_unregistered_reads_fail() {
    let mut store = docstore_core::RecordStore::default();
    store.register::<Member>().unwrap();

    match store.get_all::<Event>() {
        Err(StoreError::NotRegistered { type_name }) => assert_eq!(type_name, Event::TYPE_NAME),
        other => panic!("expected NotRegistered, got {:?}", other),
    }
}
