use blackbox_core::db::open_db_in_memory;
use blackbox_core::{SlotRepository, SqliteSlotRepository, VaultStore, CLASSIFICATION};

#[test]
fn load_from_absent_slot_yields_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());

    store.load().unwrap();
    assert!(store.list().is_empty());
}

#[test]
fn load_from_malformed_payload_degrades_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::try_new(&conn).unwrap();
    repo.write_slot("{not valid json").unwrap();

    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();
    assert!(store.list().is_empty());
}

#[test]
fn create_prepends_one_note_with_generated_defaults() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();

    let first = store.create();
    let second = store.create();

    assert_eq!(store.list().len(), 2);
    // Newest first.
    assert_eq!(store.list()[0].id, second.id);
    assert_eq!(store.list()[1].id, first.id);

    let newest = &store.list()[0];
    assert!(newest.title.starts_with("LOG_ENTRY_"));
    assert!(newest.content.is_empty());
    assert_eq!(newest.classification, CLASSIFICATION);
}

#[test]
fn rapid_creation_keeps_ids_unique_and_increasing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();

    let ids: Vec<_> = (0..10).map(|_| store.create().id).collect();
    for pair in ids.windows(2) {
        assert!(pair[1] > pair[0], "ids must be strictly increasing");
    }
}

#[test]
fn update_replaces_mutable_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();

    let note = store.create();
    assert!(store.update(note.id, "Report A", "Findings..."));

    let updated = store.get(note.id).unwrap();
    assert_eq!(updated.title, "Report A");
    assert_eq!(updated.content, "Findings...");
    // Creation metadata is untouched.
    assert_eq!(updated.date, note.date);
    assert_eq!(updated.classification, note.classification);
}

#[test]
fn update_unknown_id_is_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();

    let note = store.create();
    assert!(!store.update(note.id + 1, "x", "y"));
    assert_eq!(store.get(note.id).unwrap().title, note.title);
}

#[test]
fn delete_removes_exactly_one_matching_note() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();

    let first = store.create();
    let second = store.create();

    assert!(store.delete(first.id));
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].id, second.id);

    assert!(!store.delete(first.id), "repeat delete must be a no-op");
    assert_eq!(store.list().len(), 1);
}

#[test]
fn persist_then_load_round_trips_the_collection() {
    let conn = open_db_in_memory().unwrap();

    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();
    let note = store.create();
    assert!(store.update(note.id, "Report A", "Findings..."));
    store.persist().unwrap();
    let expected: Vec<_> = store.list().to_vec();

    let mut reloaded = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    reloaded.load().unwrap();
    assert_eq!(reloaded.list(), expected.as_slice());
}

#[test]
fn purge_clears_memory_and_deletes_the_slot_row() {
    let conn = open_db_in_memory().unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();
    store.create();
    store.persist().unwrap();

    store.purge_storage().unwrap();
    assert!(store.list().is_empty());

    let inspect = SqliteSlotRepository::try_new(&conn).unwrap();
    assert_eq!(inspect.read_slot().unwrap(), None);
}

#[test]
fn file_backed_vault_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");

    let created_id = {
        let conn = blackbox_core::db::open_db(&path).unwrap();
        let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
        store.load().unwrap();
        let note = store.create();
        store.persist().unwrap();
        note.id
    };

    let conn = blackbox_core::db::open_db(&path).unwrap();
    let mut store = VaultStore::new(SqliteSlotRepository::try_new(&conn).unwrap());
    store.load().unwrap();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].id, created_id);
}
