use rating_storage::{MemoryStateStore, SledStateStore, StateBatch, StateStore, StateValue};
use tempfile::TempDir;

fn write_counters<S: StateStore>(store: &S) {
    let mut batch = StateBatch::new(store);
    batch.set("asset", "RATING_ASSET");
    batch.add_number("supply", 1_000).unwrap();
    batch.add_number("rating*DONOR", 1_000).unwrap();
    batch.add_number("rating*p/q*DONOR", 1_000).unwrap();
    store.commit(batch.into_writes()).unwrap();
}

#[test]
fn sled_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SledStateStore::new(dir.path()).unwrap();
        write_counters(&store);
        store.flush().unwrap();
    }

    let reopened = SledStateStore::new(dir.path()).unwrap();
    assert_eq!(reopened.get_number("supply").unwrap(), 1_000);
    assert_eq!(
        reopened.get_text("asset").unwrap().as_deref(),
        Some("RATING_ASSET")
    );
    assert_eq!(reopened.snapshot().unwrap().len(), 4);
}

#[test]
fn memory_and_sled_agree() {
    let memory = MemoryStateStore::new();
    let sled = SledStateStore::temporary().unwrap();
    write_counters(&memory);
    write_counters(&sled);
    write_counters(&memory);
    write_counters(&sled);

    assert_eq!(memory.snapshot().unwrap(), sled.snapshot().unwrap());
    assert_eq!(
        sled.get("rating*DONOR").unwrap(),
        Some(StateValue::Number(2_000))
    );
}

#[test]
fn empty_commit_is_noop() {
    let store = SledStateStore::temporary().unwrap();
    let batch = StateBatch::new(&store);
    assert!(batch.is_empty());
    store.commit(batch.into_writes()).unwrap();
    assert!(store.snapshot().unwrap().is_empty());
}
