//! Keyed snapshot store with subscriptions, write-through persistence and
//! cross-tab synchronisation.
//!
//! # Design
//!
//! [`SnapshotStore`] is a cloneable handle over shared single-threaded state
//! (`Rc<RefCell<..>>`): every clone sees the same snapshots and subscribers.
//! A host creates one per document and hands clones to every group.
//!
//! | Id namespace | In memory | Durable storage | Collected on last unsubscribe |
//! |--------------|-----------|-----------------|-------------------------------|
//! | `p:<id>`     | yes       | read-through, write-through | no                    |
//! | `g:<id>`     | yes       | never           | yes                           |
//!
//! # Failure Modes
//!
//! - **Re-entrant commit**: a subscriber that calls [`SnapshotStore::set_snapshot`]
//!   for the id it is observing re-enters synchronously and receives a nested
//!   notification. Callbacks are collected before any is invoked, so this
//!   does not panic, but an unconditional write loops forever.
//! - **Storage failure**: a rejected durable write propagates from
//!   `set_snapshot`; the in-memory value is already updated but subscribers
//!   are not notified.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::id::is_persistent_id;
use crate::info::StorePanelInfo;
use crate::storage::{NoStorage, StorageBackend};

type Callback = Rc<dyn Fn()>;

struct Subscriber {
    key: u64,
    callback: Callback,
}

struct StoreInner {
    config: StoreConfig,
    storage: Box<dyn StorageBackend>,
    snapshots: FxHashMap<String, StorePanelInfo>,
    subscribers: FxHashMap<String, Vec<Subscriber>>,
    handles: FxHashMap<String, Rc<str>>,
    next_key: u64,
}

fn decode(id: &str, raw: &str) -> Result<StorePanelInfo, StoreError> {
    serde_json::from_str(raw).map_err(|err| StoreError::Decode {
        id: id.to_owned(),
        message: err.to_string(),
    })
}

fn encode(id: &str, info: &StorePanelInfo) -> Result<String, StoreError> {
    serde_json::to_string(info).map_err(|err| StoreError::Encode {
        id: id.to_owned(),
        message: err.to_string(),
    })
}

/// Shared store of the last committed layout per group id.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SnapshotStore")
            .field("config", &inner.config)
            .field("snapshots", &inner.snapshots.len())
            .field("subscribed_ids", &inner.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::without_storage()
    }
}

impl SnapshotStore {
    #[must_use]
    pub fn new(storage: impl StorageBackend + 'static) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(storage: impl StorageBackend + 'static, config: StoreConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                config,
                storage: Box::new(storage),
                snapshots: FxHashMap::default(),
                subscribers: FxHashMap::default(),
                handles: FxHashMap::default(),
                next_key: 0,
            })),
        }
    }

    /// A store with no durable backend; committing a persistent id fails
    /// with [`crate::StorageError::Unavailable`].
    #[must_use]
    pub fn without_storage() -> Self {
        Self::new(NoStorage)
    }

    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.inner.borrow().config.clone()
    }

    /// Register `callback` to run after every change to `id`'s snapshot.
    ///
    /// The callback stays registered until the returned guard is dropped.
    pub fn subscribe(&self, id: &str, callback: impl Fn() + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let key = inner.next_key;
        inner.next_key += 1;
        inner
            .subscribers
            .entry(id.to_owned())
            .or_default()
            .push(Subscriber {
                key,
                callback: Rc::new(callback),
            });
        Subscription {
            store: Rc::downgrade(&self.inner),
            id: id.to_owned(),
            key,
        }
    }

    #[must_use]
    pub fn subscriber_count(&self, id: &str) -> usize {
        self.inner.borrow().subscribers.get(id).map_or(0, Vec::len)
    }

    /// Whether `id` currently has an in-memory snapshot.
    #[must_use]
    pub fn has_snapshot(&self, id: &str) -> bool {
        self.inner.borrow().snapshots.contains_key(id)
    }

    /// The last committed snapshot for `id`.
    ///
    /// Persistent ids without an in-memory value are hydrated from durable
    /// storage on first access.
    pub fn get_snapshot(&self, id: &str) -> Result<Option<StorePanelInfo>, StoreError> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(info) = inner.snapshots.get(id) {
            return Ok(Some(info.clone()));
        }
        if !is_persistent_id(id) {
            return Ok(None);
        }
        let key = inner.config.storage_key(id);
        let Some(raw) = inner.storage.get_item(&key)? else {
            return Ok(None);
        };
        let info = decode(id, &raw)?;
        trace!(id, "hydrated snapshot from storage");
        inner.snapshots.insert(id.to_owned(), info.clone());
        Ok(Some(info))
    }

    /// Commit `value` as `id`'s snapshot: store it, write it through to
    /// durable storage for persistent ids, then notify subscribers.
    pub fn set_snapshot(&self, id: &str, value: StorePanelInfo) -> Result<(), StoreError> {
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let encoded = if is_persistent_id(id) {
                Some(encode(id, &value)?)
            } else {
                None
            };
            inner.snapshots.insert(id.to_owned(), value);
            if let Some(encoded) = encoded {
                let key = inner.config.storage_key(id);
                inner.storage.set_item(&key, &encoded)?;
            }
        }
        debug!(id, "committed snapshot");
        self.notify(id);
        Ok(())
    }

    /// Apply a change made to durable storage by another document.
    ///
    /// `key` is the raw storage key and `new_value` the new raw value
    /// (`None` for a removal). Keys outside the configured prefix and
    /// removals are ignored. The value is applied locally and never written
    /// back. Returns whether a snapshot was applied.
    pub fn handle_storage_event(
        &self,
        key: &str,
        new_value: Option<&str>,
    ) -> Result<bool, StoreError> {
        let id = {
            let inner = self.inner.borrow();
            inner.config.id_for_key(key)
        };
        let (Some(id), Some(raw)) = (id, new_value) else {
            return Ok(false);
        };
        let info = match decode(id, raw) {
            Ok(info) => info,
            Err(err) => {
                warn!(id, error = %err, "ignoring malformed storage event");
                return Err(err);
            }
        };
        self.inner
            .borrow_mut()
            .snapshots
            .insert(id.to_owned(), info);
        debug!(id, "applied snapshot from storage event");
        self.notify(id);
        Ok(true)
    }

    /// Remove `id`'s durable entry and in-memory snapshot, then notify.
    pub fn clear_persisted(&self, id: &str) -> Result<(), StoreError> {
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let key = inner.config.storage_key(id);
            inner.storage.remove_item(&key)?;
            inner.snapshots.remove(id);
        }
        debug!(id, "cleared persisted snapshot");
        self.notify(id);
        Ok(())
    }

    /// Per-id handle bundling subscribe and get.
    ///
    /// Repeated calls for the same id return handles that compare equal
    /// with [`SnapshotHandle::ptr_eq`] until the id is garbage collected.
    #[must_use]
    pub fn handle(&self, id: &str) -> SnapshotHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            Rc::clone(
                inner
                    .handles
                    .entry(id.to_owned())
                    .or_insert_with(|| Rc::from(id)),
            )
        };
        SnapshotHandle {
            store: self.clone(),
            id,
        }
    }

    fn notify(&self, id: &str) {
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .get(id)
            .map(|subscribers| {
                subscribers
                    .iter()
                    .map(|subscriber| Rc::clone(&subscriber.callback))
                    .collect()
            })
            .unwrap_or_default();
        for callback in &callbacks {
            callback();
        }
    }
}

fn release(inner: &RefCell<StoreInner>, id: &str, key: u64) {
    let mut guard = inner.borrow_mut();
    let state = &mut *guard;
    let Some(subscribers) = state.subscribers.get_mut(id) else {
        return;
    };
    let removed = subscribers
        .iter()
        .position(|subscriber| subscriber.key == key)
        .map(|index| subscribers.remove(index));
    if subscribers.is_empty() {
        state.subscribers.remove(id);
        if !is_persistent_id(id) {
            state.snapshots.remove(id);
            state.handles.remove(id);
            debug!(id, "collected ephemeral snapshot");
        }
    }
    // Callbacks may own guards of their own; drop them outside the borrow.
    drop(guard);
    drop(removed);
}

/// RAII guard for a snapshot subscriber.
///
/// Dropping the guard unsubscribes. When the last subscriber of a generated
/// id goes away, that id's snapshot and cached handle are discarded.
pub struct Subscription {
    store: Weak<RefCell<StoreInner>>,
    id: String,
    key: u64,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Explicit form of dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            release(&inner, &self.id, self.key);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Subscribe/get pair bound to one id.
#[derive(Clone)]
pub struct SnapshotHandle {
    store: SnapshotStore,
    id: Rc<str>,
}

impl SnapshotHandle {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.store.subscribe(&self.id, callback)
    }

    pub fn get_snapshot(&self) -> Result<Option<StorePanelInfo>, StoreError> {
        self.store.get_snapshot(&self.id)
    }

    /// Whether both handles came from the same cache entry.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.id, &other.id)
    }
}

impl fmt::Debug for SnapshotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotHandle")
            .field("id", &&*self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn info(pairs: &[(&str, &str)]) -> StorePanelInfo {
        StorePanelInfo {
            flex_values: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    fn counter(store: &SnapshotStore, id: &str) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let sub = store.subscribe(id, move || seen.set(seen.get() + 1));
        (count, sub)
    }

    #[test]
    fn every_subscriber_is_notified() {
        let store = SnapshotStore::without_storage();
        let (a, _sa) = counter(&store, "g:1");
        let (b, _sb) = counter(&store, "g:1");
        let (other, _so) = counter(&store, "g:2");
        store.set_snapshot("g:1", info(&[("x", "1")])).unwrap();
        assert_eq!((a.get(), b.get(), other.get()), (1, 1, 0));
        assert_eq!(store.subscriber_count("g:1"), 2);
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let store = SnapshotStore::without_storage();
        let (a, sa) = counter(&store, "g:1");
        let (_b, _sb) = counter(&store, "g:1");
        sa.unsubscribe();
        store.set_snapshot("g:1", info(&[("x", "1")])).unwrap();
        assert_eq!(a.get(), 0);
        assert_eq!(store.subscriber_count("g:1"), 1);
    }

    #[test]
    fn generated_ids_are_collected_with_last_subscriber() {
        let store = SnapshotStore::without_storage();
        let (_a, sa) = counter(&store, "g:tmp");
        let first = store.handle("g:tmp");
        store.set_snapshot("g:tmp", info(&[("x", "1")])).unwrap();
        assert!(store.has_snapshot("g:tmp"));
        assert!(first.ptr_eq(&store.handle("g:tmp")));

        drop(sa);
        assert!(!store.has_snapshot("g:tmp"));
        assert_eq!(store.subscriber_count("g:tmp"), 0);
        assert!(!first.ptr_eq(&store.handle("g:tmp")));
    }

    #[test]
    fn persistent_ids_survive_unsubscribe() {
        let store = SnapshotStore::new(MemoryStorage::new());
        let (_a, sa) = counter(&store, "p:keep");
        store.set_snapshot("p:keep", info(&[("x", "1")])).unwrap();
        drop(sa);
        assert!(store.has_snapshot("p:keep"));
    }

    #[test]
    fn persistent_commit_writes_through() {
        let storage = MemoryStorage::new();
        let store = SnapshotStore::new(storage.clone());
        store.set_snapshot("p:main", info(&[("a", "1")])).unwrap();
        store.set_snapshot("g:anon", info(&[("a", "1")])).unwrap();
        assert_eq!(
            storage.get_item("--fp-p:main").unwrap().as_deref(),
            Some(r#"{"flexValues":{"a":"1"}}"#)
        );
        assert_eq!(storage.keys(), ["--fp-p:main"]);
    }

    #[test]
    fn persistent_reads_hydrate_from_storage() {
        let storage = MemoryStorage::new();
        storage
            .set_item("--fp-p:main", r#"{"flexValues":{"a":"0 0 25%"}}"#)
            .unwrap();
        storage
            .set_item("--fp-g:anon", r#"{"flexValues":{"a":"1"}}"#)
            .unwrap();
        let store = SnapshotStore::new(storage);
        assert!(!store.has_snapshot("p:main"));
        let hydrated = store.get_snapshot("p:main").unwrap().unwrap();
        assert_eq!(hydrated.flex_value("a"), Some("0 0 25%"));
        assert!(store.has_snapshot("p:main"));
        assert_eq!(store.get_snapshot("g:anon").unwrap(), None);
    }

    #[test]
    fn malformed_stored_value_is_a_decode_error() {
        let storage = MemoryStorage::new();
        storage.set_item("--fp-p:bad", "not json").unwrap();
        let store = SnapshotStore::new(storage);
        assert!(matches!(
            store.get_snapshot("p:bad"),
            Err(StoreError::Decode { ref id, .. }) if id == "p:bad"
        ));
    }

    #[test]
    fn failed_write_skips_notification() {
        let store = SnapshotStore::without_storage();
        let (count, _sub) = counter(&store, "p:main");
        let err = store
            .set_snapshot("p:main", info(&[("a", "1")]))
            .unwrap_err();
        assert_eq!(err, StoreError::Storage(StorageError::Unavailable));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn reentrant_commit_does_not_panic() {
        let store = SnapshotStore::without_storage();
        let inner_store = store.clone();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let _sub = store.subscribe("g:loop", move || {
            seen.set(seen.get() + 1);
            if seen.get() == 1 {
                inner_store
                    .set_snapshot("g:loop", StorePanelInfo::default())
                    .unwrap();
            }
        });
        store.set_snapshot("g:loop", info(&[("a", "1")])).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(store.get_snapshot("g:loop").unwrap(), Some(StorePanelInfo::default()));
    }

    #[test]
    fn callback_may_read_the_new_value() {
        let store = SnapshotStore::without_storage();
        let reader = store.clone();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let _sub = store.subscribe("g:r", move || {
            *sink.borrow_mut() = reader.get_snapshot("g:r").unwrap();
        });
        store.set_snapshot("g:r", info(&[("a", "1")])).unwrap();
        assert_eq!(*seen.borrow(), Some(info(&[("a", "1")])));
    }

    #[test]
    fn storage_events_apply_without_writing_back() {
        let storage = MemoryStorage::new();
        let store = SnapshotStore::new(storage.clone());
        let (count, _sub) = counter(&store, "p:main");

        assert_eq!(store.handle_storage_event("unrelated", Some("{}")), Ok(false));
        assert_eq!(store.handle_storage_event("--fp-p:main", None), Ok(false));
        assert_eq!(count.get(), 0);

        let applied = store
            .handle_storage_event("--fp-p:main", Some(r#"{"flexValues":{"a":"1"}}"#))
            .unwrap();
        assert!(applied);
        assert_eq!(count.get(), 1);
        assert_eq!(
            store.get_snapshot("p:main").unwrap(),
            Some(info(&[("a", "1")]))
        );
        assert!(storage.is_empty());
    }

    #[test]
    #[traced_test]
    fn malformed_storage_event_warns() {
        let store = SnapshotStore::without_storage();
        let result = store.handle_storage_event("--fp-p:main", Some("{"));
        assert!(matches!(result, Err(StoreError::Decode { .. })));
        assert!(logs_contain("ignoring malformed storage event"));
    }

    #[test]
    fn clear_persisted_removes_durable_entry() {
        let storage = MemoryStorage::new();
        let store = SnapshotStore::new(storage.clone());
        let (count, _sub) = counter(&store, "p:main");
        store.set_snapshot("p:main", info(&[("a", "1")])).unwrap();
        store.clear_persisted("p:main").unwrap();
        assert_eq!(count.get(), 2);
        assert!(storage.is_empty());
        assert_eq!(store.get_snapshot("p:main").unwrap(), None);
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let storage = MemoryStorage::new();
        let config = StoreConfig {
            storage_prefix: "app.".into(),
            ..StoreConfig::default()
        };
        let store = SnapshotStore::with_config(storage.clone(), config);
        store.set_snapshot("p:x", info(&[("a", "1")])).unwrap();
        assert_eq!(storage.keys(), ["app.p:x"]);
        assert_eq!(
            store.handle_storage_event("--fp-p:x", Some(r#"{"flexValues":{}}"#)),
            Ok(false)
        );
    }

    #[test]
    fn dropping_guard_after_store_is_harmless() {
        let store = SnapshotStore::without_storage();
        let (_count, sub) = counter(&store, "g:late");
        drop(store);
        drop(sub);
    }
}
