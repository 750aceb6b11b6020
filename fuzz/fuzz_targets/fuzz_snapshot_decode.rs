#![no_main]

use flexpanels_store::{MemoryStorage, SnapshotStore, StorageBackend};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // Reading a malformed stored value must fail cleanly, never panic.
    let storage = MemoryStorage::new();
    if storage.set_item("--fp-p:fuzz", raw).is_err() {
        return;
    }
    let store = SnapshotStore::new(storage);
    if let Ok(Some(info)) = store.get_snapshot("p:fuzz") {
        assert!(store.has_snapshot("p:fuzz"));
        assert_eq!(store.get_snapshot("p:fuzz"), Ok(Some(info)));
    }

    // Storage events carry arbitrary values too.
    let _ = store.handle_storage_event("--fp-p:event", Some(raw));
});
