#![forbid(unsafe_code)]

//! Resize algorithm and presentation model for linear panel groups.
//!
//! A panel group is a one-dimensional sequence `panel | resizer | panel ...`
//! along a horizontal or vertical main axis. This crate is host-agnostic:
//! it takes a measured [`GroupState`] and produces a [`GroupLayout`]
//! (percentages, the single flexible panel, ARIA slider bounds and the
//! constraint flag). Measuring and mutating real elements lives in
//! `flexpanels-web`.
//!
//! Every function here is pure and deterministic.

pub mod error;
pub mod group;
pub mod length;
pub mod presentation;
pub mod resize;

pub use error::{LayoutError, Side, StructureError};
pub use group::{GroupEntry, GroupState, Orientation, PanelEntry, ResizerEntry};
pub use length::{resolve_length, resolve_max_length, resolve_min_length};
pub use presentation::{
    ConstraintHit, GroupLayout, PanelLayout, convert_group_state_to_layout, flex_shorthand,
};
pub use resize::{
    ResizedGroup, assign_flex, calculate_new_layout, collapse_capacity, expansion_capacity,
    resize_group,
};
