use std::fmt;

use flexpanels_layout::{LayoutError, StructureError};
use flexpanels_store::StoreError;

/// Failure while handling a resize, observer or hydration event.
///
/// Every variant is an integration bug (bad markup, stale resizer
/// coordinates) or a storage failure; none is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    Structure(StructureError),
    Layout(LayoutError),
    Store(StoreError),
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(err) => write!(f, "invalid panel structure: {err}"),
            Self::Layout(err) => write!(f, "layout error: {err}"),
            Self::Store(err) => write!(f, "snapshot store error: {err}"),
        }
    }
}

impl std::error::Error for ResizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Structure(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StructureError> for ResizeError {
    fn from(err: StructureError) -> Self {
        Self::Structure(err)
    }
}

impl From<LayoutError> for ResizeError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<StoreError> for ResizeError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
