//! Structural and algorithmic errors.
//!
//! Both families describe integration bugs (wrong nesting, missing ids,
//! out-of-range resizer coordinates), not conditions a user can trigger.

use std::fmt;

/// Which neighbour of a resizer is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// Errors from [`crate::calculate_new_layout`] and [`crate::resize_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    InvalidResizerIndex { index: usize, len: usize },
    NotAResizer { index: usize },
    MissingAdjacentPanel { index: usize, side: Side },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResizerIndex { index, len } => {
                write!(f, "resizer index {index} out of range for {len} entries")
            }
            Self::NotAResizer { index } => write!(f, "entry {index} is not a resizer"),
            Self::MissingAdjacentPanel { index, side } => {
                write!(f, "resizer {index} has no adjacent panel {side} it")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Markup that cannot be read as a panel group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// The container does not carry the group class.
    NotAGroup,
    /// The container has no group id attribute.
    MissingGroupId,
    /// A panel at the given child position has no child id attribute.
    MissingChildId { index: usize },
    /// A resizer was asked for its group but its parent is not a group.
    ResizerOutsideGroup,
    /// A resizer element is not among its group's measured entries.
    UnknownResizer,
    LeadingResizer,
    TrailingResizer,
    AdjacentResizers { index: usize },
    AdjacentPanels { index: usize },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAGroup => f.write_str("element is not a panel group"),
            Self::MissingGroupId => f.write_str("group element must have a group id attribute"),
            Self::MissingChildId { index } => {
                write!(f, "panel at child position {index} must have a child id attribute")
            }
            Self::ResizerOutsideGroup => {
                f.write_str("resizer must be placed within a panel group element")
            }
            Self::UnknownResizer => f.write_str("resizer is not a measured child of its group"),
            Self::LeadingResizer => f.write_str("group must start with a panel"),
            Self::TrailingResizer => f.write_str("group must end with a panel"),
            Self::AdjacentResizers { index } => {
                write!(f, "resizer at entry {index} follows another resizer")
            }
            Self::AdjacentPanels { index } => {
                write!(f, "panel at entry {index} follows another panel without a resizer")
            }
        }
    }
}

impl std::error::Error for StructureError {}
