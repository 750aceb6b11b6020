//! Durable key/value storage backends.
//!
//! The browser's `localStorage` is the model: string keys, string values,
//! shared by every document of the same origin. Hosts implement
//! [`StorageBackend`] over whatever durable store they have.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Failure of a durable storage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No durable storage exists (disabled, private mode, server render).
    Unavailable,
    /// The write would exceed the storage quota.
    QuotaExceeded { key: String },
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("durable storage is unavailable"),
            Self::QuotaExceeded { key } => write!(f, "storage quota exceeded writing {key}"),
            Self::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value storage with `localStorage` semantics.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    items: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorageInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// In-memory storage.
///
/// Clones share the same items, so two stores built over clones of one
/// `MemoryStorage` observe each other's writes like two tabs over one
/// `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryStorageInner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().quota_bytes = Some(bytes);
        storage
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().items.keys().cloned().collect()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.inner.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota_bytes
            && inner.used_bytes_without(key) + key.len() + value.len() > quota
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            });
        }
        inner.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.borrow_mut().items.remove(key);
        Ok(())
    }
}

/// Backend for hosts without durable storage: nothing is ever stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl StorageBackend for NoStorage {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}
