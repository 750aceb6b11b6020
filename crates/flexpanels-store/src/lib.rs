#![forbid(unsafe_code)]

//! Last-committed layout per panel group.
//!
//! The store is the only place a layout is committed. Transient drag frames
//! never reach it; a completed drag or key press calls
//! [`SnapshotStore::set_snapshot`], which updates memory, writes persistent
//! ids through to a [`StorageBackend`] and notifies every subscriber of that
//! id. Changes made by other documents arrive through
//! [`SnapshotStore::handle_storage_event`].

pub mod config;
pub mod error;
pub mod hydrate;
pub mod id;
pub mod info;
pub mod storage;
pub mod store;

pub use config::{CHILD_FLEX_PROPERTY_PREFIX, DEFAULT_STORAGE_PREFIX, StoreConfig};
pub use error::StoreError;
pub use hydrate::{GROUP_ID_ATTRIBUTE, hydrate_script};
pub use id::{GENERATED_ID_PREFIX, GroupId, PERSISTENT_ID_PREFIX, is_persistent_id};
pub use info::StorePanelInfo;
pub use storage::{MemoryStorage, NoStorage, StorageBackend, StorageError, StorageResult};
pub use store::{SnapshotHandle, SnapshotStore, Subscription};
