//! Geometry extraction: measured host elements to a [`GroupState`].
//!
//! Extraction is a pure read. It is repeated at the start of every gesture,
//! key press and observer callback so a layout is always computed from
//! current geometry, never from a cached tree.

use flexpanels_layout::{
    GroupEntry, GroupState, Orientation, PanelEntry, ResizerEntry, StructureError,
    resolve_max_length, resolve_min_length,
};
use tracing::warn;

use crate::constants::{
    ATTR_CHILD_ID, ATTR_FLEX, CLASS_PANEL, CLASS_PANEL_GROUP, CLASS_RESIZER, GROUP_ID_ATTRIBUTE,
    SCRIPT_TAG,
};
use crate::dom::{DomHost, main_axis_overhead};

/// A measured group together with the element behind every entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedGroup<E> {
    pub state: GroupState,
    /// The group container.
    pub element: E,
    /// One element per `state.entries` item, same order.
    pub entries: Vec<E>,
}

impl<E: PartialEq> ExtractedGroup<E> {
    /// Entry index of `resizer`, if it is one of this group's resizers.
    pub fn resizer_index(&self, resizer: &E) -> Option<usize> {
        self.entries
            .iter()
            .zip(&self.state.entries)
            .position(|(element, entry)| element == resizer && entry.is_resizer())
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.state.orientation
    }
}

/// Orientation from the container's computed `flex-direction`.
pub fn group_orientation<H: DomHost>(host: &H, group: &H::Element) -> Orientation {
    match host.computed_style(group, "flex-direction").as_str() {
        "column" | "column-reverse" => Orientation::Vertical,
        _ => Orientation::Horizontal,
    }
}

/// The group a resizer belongs to: its parent, which must be a group.
pub fn group_for_resizer<H: DomHost>(
    host: &H,
    resizer: &H::Element,
) -> Result<H::Element, StructureError> {
    host.parent(resizer)
        .filter(|parent| host.has_class(parent, CLASS_PANEL_GROUP))
        .ok_or(StructureError::ResizerOutsideGroup)
}

/// Measure `group` and its direct children.
///
/// Children are classified by class: resizers, panels, and `SCRIPT`
/// elements (skipped silently). Anything else is skipped with a warning.
/// Panel min/max lengths are resolved against the container length, and
/// the minimum is never below the panel's own border and padding.
pub fn extract_state<H: DomHost>(
    host: &H,
    group: &H::Element,
) -> Result<ExtractedGroup<H::Element>, StructureError> {
    if !host.has_class(group, CLASS_PANEL_GROUP) {
        return Err(StructureError::NotAGroup);
    }
    let id = host
        .attribute(group, GROUP_ID_ATTRIBUTE)
        .filter(|id| !id.is_empty())
        .ok_or(StructureError::MissingGroupId)?;

    let orientation = group_orientation(host, group);
    let (min_property, max_property) = match orientation {
        Orientation::Horizontal => ("min-width", "max-width"),
        Orientation::Vertical => ("min-height", "max-height"),
    };
    let container_size = host.offset_size(group, orientation);

    let mut state = GroupState::new(id, container_size, orientation);
    let mut entries = Vec::new();

    for (index, child) in host.children(group).into_iter().enumerate() {
        if host.has_class(&child, CLASS_RESIZER) {
            let size = host.offset_size(&child, orientation);
            state.entries.push(GroupEntry::Resizer(ResizerEntry::new(size)));
            entries.push(child);
        } else if host.has_class(&child, CLASS_PANEL) {
            let child_id = host
                .attribute(&child, ATTR_CHILD_ID)
                .filter(|child_id| !child_id.is_empty())
                .ok_or(StructureError::MissingChildId { index })?;
            let size = host.offset_size(&child, orientation);
            let overhead = main_axis_overhead(host, &child, orientation);
            let min_size = resolve_min_length(
                &host.computed_style(&child, min_property),
                container_size,
            )
            .max(overhead);
            let max_size = resolve_max_length(
                &host.computed_style(&child, max_property),
                container_size,
            );
            let flex = host.attribute(&child, ATTR_FLEX).as_deref() == Some("true");
            state.entries.push(GroupEntry::Panel(PanelEntry {
                child_id,
                size,
                min_size,
                max_size,
                flex,
            }));
            entries.push(child);
        } else if host.tag_name(&child).eq_ignore_ascii_case(SCRIPT_TAG) {
            continue;
        } else {
            warn!(
                group = %state.id,
                index,
                tag = %host.tag_name(&child),
                "unknown element in panel group"
            );
        }
    }

    Ok(ExtractedGroup {
        state,
        element: group.clone(),
        entries,
    })
}
