//! Keeping a rendered group in step with its snapshot.
//!
//! Every rendered group subscribes to its id. A commit anywhere (another
//! group sharing a persistence id, another document through a storage
//! event) marks the binding stale from inside the store's notification;
//! the host then calls [`GroupBinding::sync`] on its next render pass to
//! write the snapshot onto the element. Nothing touches the host from
//! within the store callback itself.

use std::cell::Cell;
use std::rc::Rc;

use flexpanels_store::{SnapshotHandle, SnapshotStore, StoreConfig, StoreError, Subscription};

use crate::apply::apply_snapshot_to_group;
use crate::dom::DomHost;

/// Subscription of one group element to its snapshot.
#[derive(Debug)]
pub struct GroupBinding<E> {
    element: E,
    handle: SnapshotHandle,
    config: StoreConfig,
    stale: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl<E> GroupBinding<E> {
    /// Subscribe `element` to the snapshot of `id`.
    pub fn bind(store: &SnapshotStore, id: &str, element: E) -> Self {
        let handle = store.handle(id);
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        let subscription = handle.subscribe(move || flag.set(true));
        Self {
            element,
            handle,
            config: store.config(),
            stale,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.handle.id()
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Whether a commit arrived since the last [`sync`](Self::sync).
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Write the current snapshot onto the element if a commit arrived.
    /// Returns whether anything was written.
    pub fn sync<H: DomHost<Element = E>>(&self, host: &mut H) -> Result<bool, StoreError> {
        if !self.stale.replace(false) {
            return Ok(false);
        }
        let Some(snapshot) = self.handle.get_snapshot()? else {
            return Ok(false);
        };
        apply_snapshot_to_group(host, &self.config, &self.element, &snapshot);
        Ok(true)
    }
}
