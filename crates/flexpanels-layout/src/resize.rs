//! Resizer movement: capacity bounds, nearest-first distribution and flex
//! reassignment.
//!
//! ```text
//!   before side (walked right-to-left)   resizer   after side (walked left-to-right)
//!   [p0] | [p1] | [p2]                     |       [p3] | [p4]
//! ```
//!
//! A positive offset moves the resizer toward the end of the main axis: the
//! after side collapses and the before side expands. The movement is capped
//! by the more constrained of the two sides, then handed out panel by panel
//! starting at the resizer.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Side};
use crate::group::{GroupEntry, GroupState, PanelEntry};
use crate::presentation::{ConstraintHit, GroupLayout, convert_group_state_to_layout};

/// Result of moving one resizer, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizedGroup {
    /// The group with updated panel sizes and reassigned flex flags.
    pub state: GroupState,
    /// Which bound stopped the movement, if the request exceeded capacity.
    pub constraint: Option<ConstraintHit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeOp {
    Collapse,
    Expand,
}

/// Total space the given panels can free by shrinking to their minimums.
pub fn collapse_capacity<'a>(entries: impl IntoIterator<Item = &'a GroupEntry>) -> f64 {
    entries
        .into_iter()
        .filter_map(GroupEntry::as_panel)
        .map(PanelEntry::collapse_room)
        .sum()
}

/// Total space the given panels can absorb by growing to their maximums.
pub fn expansion_capacity<'a>(entries: impl IntoIterator<Item = &'a GroupEntry>) -> f64 {
    entries
        .into_iter()
        .filter_map(GroupEntry::as_panel)
        .map(PanelEntry::expand_room)
        .sum()
}

/// Leave exactly one flexible panel: the last one that was already flexible,
/// or the last panel when none was.
pub fn assign_flex(entries: &mut [GroupEntry]) {
    let mut last_panel = None;
    let mut last_flex_panel = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        if let GroupEntry::Panel(panel) = entry {
            last_panel = Some(index);
            if panel.flex {
                last_flex_panel = Some(index);
            }
            panel.flex = false;
        }
    }
    if let Some(index) = last_flex_panel.or(last_panel)
        && let Some(panel) = entries[index].as_panel_mut()
    {
        panel.flex = true;
    }
}

fn check_resizer(entries: &[GroupEntry], resizer_index: usize) -> Result<(), LayoutError> {
    let len = entries.len();
    if resizer_index >= len {
        return Err(LayoutError::InvalidResizerIndex {
            index: resizer_index,
            len,
        });
    }
    if !entries[resizer_index].is_resizer() {
        return Err(LayoutError::NotAResizer {
            index: resizer_index,
        });
    }
    let before_is_panel = resizer_index
        .checked_sub(1)
        .is_some_and(|index| entries[index].is_panel());
    if !before_is_panel {
        return Err(LayoutError::MissingAdjacentPanel {
            index: resizer_index,
            side: Side::Before,
        });
    }
    let after_is_panel = entries
        .get(resizer_index + 1)
        .is_some_and(GroupEntry::is_panel);
    if !after_is_panel {
        return Err(LayoutError::MissingAdjacentPanel {
            index: resizer_index,
            side: Side::After,
        });
    }
    Ok(())
}

/// Hand `amount` out to the panels in iteration order, exhausting each
/// panel's room before moving on. Returns the amount actually applied.
fn progressive_resize<'a>(
    entries: impl Iterator<Item = &'a mut GroupEntry>,
    amount: f64,
    op: ResizeOp,
) -> f64 {
    let mut remaining = amount;
    for panel in entries.filter_map(GroupEntry::as_panel_mut) {
        if remaining <= 0.0 {
            break;
        }
        let room = match op {
            ResizeOp::Collapse => panel.collapse_room(),
            ResizeOp::Expand => panel.expand_room(),
        };
        if room <= 0.0 {
            continue;
        }
        if remaining >= room {
            // Land exactly on the bound rather than on size - room.
            panel.size = match op {
                ResizeOp::Collapse => panel.min_size,
                ResizeOp::Expand => panel.max_size,
            };
            remaining -= room;
        } else {
            match op {
                ResizeOp::Collapse => panel.size -= remaining,
                ResizeOp::Expand => panel.size += remaining,
            }
            remaining = 0.0;
        }
    }
    amount - remaining
}

/// Move the resizer at `resizer_index` by `offset` pixels and return the
/// resulting pixel sizes.
pub fn resize_group(
    group: &GroupState,
    resizer_index: usize,
    offset: f64,
) -> Result<ResizedGroup, LayoutError> {
    check_resizer(&group.entries, resizer_index)?;

    let offset = if offset.is_nan() { 0.0 } else { offset };
    let forward = offset > 0.0;

    let before = &group.entries[..resizer_index];
    let after = &group.entries[resizer_index + 1..];
    let (collapse_cap, expand_cap) = if forward {
        (collapse_capacity(after), expansion_capacity(before))
    } else {
        (collapse_capacity(before), expansion_capacity(after))
    };
    let max_movement = collapse_cap.min(expand_cap);
    let requested = offset.abs();
    let movement = requested.min(max_movement);

    let mut state = group.clone();
    {
        let (before, rest) = state.entries.split_at_mut(resizer_index);
        let after = &mut rest[1..];
        if forward {
            progressive_resize(after.iter_mut(), movement, ResizeOp::Collapse);
            progressive_resize(before.iter_mut().rev(), movement, ResizeOp::Expand);
        } else {
            progressive_resize(before.iter_mut().rev(), movement, ResizeOp::Collapse);
            progressive_resize(after.iter_mut(), movement, ResizeOp::Expand);
        }
    }
    assign_flex(&mut state.entries);

    let constraint = (requested > max_movement).then(|| {
        if expand_cap <= collapse_cap {
            ConstraintHit::Max
        } else {
            ConstraintHit::Min
        }
    });

    Ok(ResizedGroup { state, constraint })
}

/// Compute the layout that results from moving the resizer at
/// `resizer_index` by `offset` pixels.
///
/// Pure and deterministic: identical inputs produce identical output.
pub fn calculate_new_layout(
    group: &GroupState,
    resizer_index: usize,
    offset: f64,
) -> Result<GroupLayout, LayoutError> {
    let resized = resize_group(group, resizer_index, offset)?;
    let mut layout = convert_group_state_to_layout(&resized.state);
    layout.constraint = resized.constraint;
    Ok(layout)
}
