#![forbid(unsafe_code)]

//! Flexpanels public facade crate.
//!
//! Resizable panel groups laid out with flexbox: panels separated by
//! draggable resizers, with min/max constraints, one flexible panel per
//! group, committed layouts shared between groups of the same id and
//! persisted across reloads.
//!
//! This crate re-exports the stable surface of the internal crates and a
//! prelude for day-to-day use.

use std::fmt;

// --- Layout re-exports -----------------------------------------------------

pub use flexpanels_layout::{
    ConstraintHit, GroupEntry, GroupLayout, GroupState, LayoutError, Orientation, PanelEntry,
    PanelLayout, ResizerEntry, StructureError, assign_flex, calculate_new_layout,
    convert_group_state_to_layout, flex_shorthand, resolve_length,
};

// --- Store re-exports ------------------------------------------------------

pub use flexpanels_store::{
    GroupId, MemoryStorage, NoStorage, SnapshotHandle, SnapshotStore, StorageBackend,
    StorageError, StoreConfig, StoreError, StorePanelInfo, Subscription, hydrate_script,
};

// --- Web re-exports --------------------------------------------------------

pub use flexpanels_web::{
    DomHost, GroupBinding, GroupObserver, KeyModifiers, MemoryDom, NodeId, PanelOptions,
    PointerPosition, ResizeConfig, ResizeController, ResizeDispatch, ResizeEffect, ResizeError,
    extract_state, handle_group_changes, hydrate_group,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for flexpanels hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Markup that is not a valid panel group.
    Structure(StructureError),
    /// Resizer coordinates that do not match the group.
    Layout(LayoutError),
    /// Snapshot store or durable storage failure.
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(err) => write!(f, "{err}"),
            Self::Layout(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Structure(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StructureError> for Error {
    fn from(err: StructureError) -> Self {
        Self::Structure(err)
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Store(StoreError::Storage(err))
    }
}

impl From<ResizeError> for Error {
    fn from(err: ResizeError) -> Self {
        match err {
            ResizeError::Structure(err) => Self::Structure(err),
            ResizeError::Layout(err) => Self::Layout(err),
            ResizeError::Store(err) => Self::Store(err),
        }
    }
}

/// Standard result type for flexpanels APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DomHost, Error, GroupBinding, GroupId, GroupObserver, KeyModifiers, Orientation,
        PanelOptions, PointerPosition, ResizeController, Result, SnapshotStore, StoreConfig,
    };

    pub use crate::{layout, store, web};
}

pub use flexpanels_layout as layout;
pub use flexpanels_store as store;
pub use flexpanels_web as web;
