#![forbid(unsafe_code)]

//! `flexpanels-web` connects the layout core and the snapshot store to a
//! document.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment owns the real document and
//!   forwards measurements, mutations and input events through [`DomHost`].
//! - **Preview, then commit**: drag frames only rewrite custom properties;
//!   a release or key press commits through the [`SnapshotStore`].
//! - **No bindings**: nothing here depends on `wasm-bindgen`. A browser
//!   host implements [`DomHost`] over `web-sys`; tests and server renders
//!   use [`MemoryDom`].
//!
//! [`SnapshotStore`]: flexpanels_store::SnapshotStore

pub mod apply;
pub mod binding;
pub mod constants;
pub mod dom;
pub mod error;
pub mod extract;
pub mod hydrate;
pub mod interaction;
pub mod markup;
pub mod memory;
pub mod observer;

pub use apply::{apply_aria_to_group, apply_layout_to_group, apply_snapshot_to_group};
pub use binding::GroupBinding;
pub use dom::DomHost;
pub use error::ResizeError;
pub use extract::{ExtractedGroup, extract_state, group_for_resizer, group_orientation};
pub use hydrate::hydrate_group;
pub use interaction::{
    KeyModifiers, ListenerCommand, ListenerSet, PointerPosition, ResizeConfig, ResizeController,
    ResizeDispatch, ResizeEffect, ResizeIgnoredReason, ResizeLogEntry, ResizeLogOutcome,
    ResizePhase, ResizeSource,
};
pub use markup::{ChildIdAllocator, PanelOptions};
pub use memory::{MemoryDom, NodeId};
pub use observer::{GroupObserver, handle_group_changes};
