use std::fmt;

use crate::storage::StorageError;

/// Errors from [`crate::SnapshotStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The durable backend rejected a read, write or removal.
    Storage(StorageError),
    /// A stored payload for `id` is not a valid snapshot.
    Decode { id: String, message: String },
    /// A snapshot for `id` could not be serialised.
    Encode { id: String, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Decode { id, message } => {
                write!(f, "stored snapshot for {id} is malformed: {message}")
            }
            Self::Encode { id, message } => {
                write!(f, "snapshot for {id} could not be encoded: {message}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Decode { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}
