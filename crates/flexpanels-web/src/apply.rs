//! Writing computed layouts back to the host document.

use flexpanels_layout::GroupLayout;
use flexpanels_store::{SnapshotStore, StoreConfig, StoreError, StorePanelInfo};

use crate::constants::{ATTR_CHILD_ID, ATTR_DIRTY, ATTR_ID, CLASS_RESIZER};
use crate::dom::{DomHost, following_panel, preceding_panel};
use crate::extract::ExtractedGroup;

/// Write `layout`'s flex shorthands as `--fp-flex-<childId>` custom
/// properties on the group element.
///
/// With `commit` the layout also becomes the group's snapshot (persisted for
/// `p:` ids, broadcast to every subscriber), ARIA values are refreshed and
/// the group is marked dirty so later observer passes keep reconciling it.
/// Without `commit` only the custom properties change; this is the per-frame
/// drag path.
pub fn apply_layout_to_group<H: DomHost>(
    host: &mut H,
    store: &SnapshotStore,
    group: &ExtractedGroup<H::Element>,
    layout: &GroupLayout,
    commit: bool,
) -> Result<(), StoreError> {
    let config = store.config();
    for (child_id, value) in layout.flex_values() {
        host.set_style_property(&group.element, &config.child_flex_property(child_id), &value);
    }
    if commit {
        store.set_snapshot(&group.state.id, StorePanelInfo::from_layout(layout))?;
        apply_aria_to_group(host, &group.element, layout);
        host.set_attribute(&group.element, ATTR_DIRTY, "true");
    }
    Ok(())
}

/// Write a stored snapshot's flex values onto `group` and mark it dirty.
///
/// Used when another instance or another document commits a layout for a
/// shared id; no ARIA is touched because the host reflows first and the
/// next observer pass recomputes it from fresh geometry.
pub fn apply_snapshot_to_group<H: DomHost>(
    host: &mut H,
    config: &StoreConfig,
    group: &H::Element,
    snapshot: &StorePanelInfo,
) {
    for (child_id, value) in &snapshot.flex_values {
        host.set_style_property(group, &config.child_flex_property(child_id), value);
    }
    if !snapshot.is_empty() {
        host.set_attribute(group, ATTR_DIRTY, "true");
    }
}

/// Remove the `--fp-flex-<childId>` property of every listed child.
pub(crate) fn clear_flex_properties<'a, H: DomHost>(
    host: &mut H,
    config: &StoreConfig,
    group: &H::Element,
    child_ids: impl IntoIterator<Item = &'a str>,
) {
    for child_id in child_ids {
        host.remove_style_property(group, &config.child_flex_property(child_id));
    }
}

fn element_id<H: DomHost>(host: &H, element: &H::Element) -> Option<String> {
    host.attribute(element, ATTR_ID)
        .filter(|id| !id.is_empty())
        .or_else(|| host.attribute(element, ATTR_CHILD_ID))
}

fn format_aria(value: f64) -> String {
    // Integral pixel positions print without a fraction, like JS numbers.
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Refresh `aria-valuemin`, `aria-valuemax`, `aria-valuenow` and
/// `aria-controls` on every resizer of `group`.
///
/// Values come from the layout entry of the panel preceding each resizer
/// and default to 0 when that panel is missing from `layout`.
pub fn apply_aria_to_group<H: DomHost>(host: &mut H, group: &H::Element, layout: &GroupLayout) {
    let resizers: Vec<H::Element> = host
        .children(group)
        .into_iter()
        .filter(|child| host.has_class(child, CLASS_RESIZER))
        .collect();

    for resizer in resizers {
        let before = preceding_panel(host, &resizer);
        let after = following_panel(host, &resizer);

        let panel_layout = before
            .as_ref()
            .and_then(|panel| host.attribute(panel, ATTR_CHILD_ID))
            .and_then(|child_id| layout.panel(&child_id).copied());
        let (min, max, now) = panel_layout
            .map(|panel| (panel.aria_min, panel.aria_max, panel.aria_now))
            .unwrap_or_default();

        let controls = [before, after]
            .iter()
            .flatten()
            .filter_map(|panel| element_id(host, panel))
            .collect::<Vec<_>>()
            .join(" ");

        host.set_attribute(&resizer, "aria-valuemin", &format_aria(min));
        host.set_attribute(&resizer, "aria-valuemax", &format_aria(max));
        host.set_attribute(&resizer, "aria-valuenow", &format_aria(now));
        host.set_attribute(&resizer, "aria-controls", &controls);
    }
}
