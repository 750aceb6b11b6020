//! Reconciliation after a group is resized or its children change.
//!
//! Hosts wire one shared resize observer and one shared child-list mutation
//! observer to [`GroupObserver`]. Observer callbacks only record which
//! groups changed; [`GroupObserver::flush`] then runs
//! [`handle_group_changes`] once per recorded group, in the order the
//! changes arrived.

use flexpanels_layout::{GroupLayout, assign_flex, convert_group_state_to_layout};
use flexpanels_store::SnapshotStore;
use tracing::debug;

use crate::apply::{apply_aria_to_group, apply_layout_to_group};
use crate::constants::ATTR_DIRTY;
use crate::dom::DomHost;
use crate::error::ResizeError;
use crate::extract::extract_state;

/// Re-measure `group` and bring its presentation up to date.
///
/// ARIA values are always refreshed. Flex values are only rewritten for a
/// dirty group (one that has a committed layout): the flexible panel is
/// reassigned, so a panel that disappeared cannot leave a hole, and the
/// result is committed. Groups that were never resized keep their
/// authored defaults. Returns the committed layout, if any.
pub fn handle_group_changes<H: DomHost>(
    host: &mut H,
    store: &SnapshotStore,
    group: &H::Element,
) -> Result<Option<GroupLayout>, ResizeError> {
    let mut extracted = extract_state(host, group)?;
    let layout = convert_group_state_to_layout(&extracted.state);
    apply_aria_to_group(host, group, &layout);

    if host.attribute(group, ATTR_DIRTY).as_deref() != Some("true") {
        return Ok(None);
    }

    assign_flex(&mut extracted.state.entries);
    let updated = convert_group_state_to_layout(&extracted.state);
    apply_layout_to_group(host, store, &extracted, &updated, true)?;
    debug!(group = %extracted.state.id, "reconciled dirty group");
    Ok(Some(updated))
}

/// Registry of observed group elements plus the queue of pending changes.
#[derive(Debug, Clone)]
pub struct GroupObserver<E> {
    observed: Vec<E>,
    pending: Vec<E>,
}

impl<E> Default for GroupObserver<E> {
    fn default() -> Self {
        Self {
            observed: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<E: Clone + PartialEq> GroupObserver<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `group`. Returns `true` when it is the first observed
    /// element, i.e. when the host should create its shared observers.
    pub fn observe(&mut self, group: E) -> bool {
        let first = self.observed.is_empty();
        if !self.observed.contains(&group) {
            self.observed.push(group);
        }
        first
    }

    /// Stop observing `group`. Returns `true` when no element is left, i.e.
    /// when the host should disconnect its shared mutation observer.
    pub fn unobserve(&mut self, group: &E) -> bool {
        self.observed.retain(|observed| observed != group);
        self.pending.retain(|pending| pending != group);
        self.observed.is_empty()
    }

    #[must_use]
    pub fn is_observed(&self, group: &E) -> bool {
        self.observed.contains(group)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Record a resize or child-list change on `group`. Changes to
    /// unobserved elements and repeats of a pending group are dropped.
    pub fn record(&mut self, group: &E) {
        if self.is_observed(group) && !self.pending.contains(group) {
            self.pending.push(group.clone());
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Reconcile every recorded group. Returns how many were reconciled.
    ///
    /// Stops at the first error; groups after it stay pending.
    pub fn flush<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
    ) -> Result<usize, ResizeError> {
        let mut handled = 0;
        while !self.pending.is_empty() {
            let group = self.pending.remove(0);
            handle_group_changes(host, store, &group)?;
            handled += 1;
        }
        Ok(handled)
    }
}
