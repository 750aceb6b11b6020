//! Measured panel-group model.
//!
//! A [`GroupState`] is an immutable snapshot of one group container: the
//! ordered panel/resizer sequence along the main axis, the container length,
//! and the orientation. It is re-derived from the host on every interaction
//! and never cached across gestures.

use serde::{Deserialize, Serialize};

use crate::error::StructureError;

/// Main axis of a panel group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Panels arranged left to right (`flex-direction: row`).
    #[default]
    Horizontal,
    /// Panels arranged top to bottom (`flex-direction: column`).
    Vertical,
}

impl Orientation {
    /// The value used for `aria-orientation` and orientation class suffixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

/// One leaf panel inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    /// Identifier unique within the parent group.
    pub child_id: String,
    /// Measured length along the main axis, in pixels.
    pub size: f64,
    /// Resolved minimum length in pixels.
    pub min_size: f64,
    /// Resolved maximum length in pixels; `f64::INFINITY` when unbounded.
    pub max_size: f64,
    /// Whether this panel absorbs leftover space.
    pub flex: bool,
}

impl PanelEntry {
    /// Unconstrained panel of the given size.
    #[must_use]
    pub fn new(child_id: impl Into<String>, size: f64) -> Self {
        Self {
            child_id: child_id.into(),
            size,
            min_size: 0.0,
            max_size: f64::INFINITY,
            flex: false,
        }
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_flex(mut self, flex: bool) -> Self {
        self.flex = flex;
        self
    }

    /// Space this panel can give up before reaching its minimum.
    #[must_use]
    pub fn collapse_room(&self) -> f64 {
        (self.size - self.min_size).max(0.0)
    }

    /// Space this panel can take before reaching its maximum.
    #[must_use]
    pub fn expand_room(&self) -> f64 {
        (self.max_size - self.size).max(0.0)
    }
}

/// A separator between two adjacent panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizerEntry {
    /// Thickness along the main axis, in pixels.
    pub size: f64,
}

impl ResizerEntry {
    #[must_use]
    pub const fn new(size: f64) -> Self {
        Self { size }
    }
}

/// One child of a group, in DOM order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupEntry {
    Panel(PanelEntry),
    Resizer(ResizerEntry),
}

impl GroupEntry {
    #[must_use]
    pub fn size(&self) -> f64 {
        match self {
            Self::Panel(panel) => panel.size,
            Self::Resizer(resizer) => resizer.size,
        }
    }

    #[must_use]
    pub fn as_panel(&self) -> Option<&PanelEntry> {
        match self {
            Self::Panel(panel) => Some(panel),
            Self::Resizer(_) => None,
        }
    }

    pub fn as_panel_mut(&mut self) -> Option<&mut PanelEntry> {
        match self {
            Self::Panel(panel) => Some(panel),
            Self::Resizer(_) => None,
        }
    }

    #[must_use]
    pub const fn is_panel(&self) -> bool {
        matches!(self, Self::Panel(_))
    }

    #[must_use]
    pub const fn is_resizer(&self) -> bool {
        matches!(self, Self::Resizer(_))
    }
}

impl From<PanelEntry> for GroupEntry {
    fn from(panel: PanelEntry) -> Self {
        Self::Panel(panel)
    }
}

impl From<ResizerEntry> for GroupEntry {
    fn from(resizer: ResizerEntry) -> Self {
        Self::Resizer(resizer)
    }
}

/// Snapshot of one group as measured from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    /// Stable group identifier (namespaced, e.g. `p:main` or `g:r1`).
    pub id: String,
    /// Alternating panel/resizer sequence in DOM order.
    pub entries: Vec<GroupEntry>,
    /// Container length along the main axis, in pixels.
    pub size: f64,
    pub orientation: Orientation,
}

impl GroupState {
    #[must_use]
    pub fn new(id: impl Into<String>, size: f64, orientation: Orientation) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
            size,
            orientation,
        }
    }

    /// Builder-style append of a panel.
    #[must_use]
    pub fn with_panel(mut self, panel: PanelEntry) -> Self {
        self.entries.push(GroupEntry::Panel(panel));
        self
    }

    /// Builder-style append of a resizer.
    #[must_use]
    pub fn with_resizer(mut self, size: f64) -> Self {
        self.entries.push(GroupEntry::Resizer(ResizerEntry::new(size)));
        self
    }

    /// Iterate over the panels in order, skipping resizers.
    pub fn panels(&self) -> impl Iterator<Item = &PanelEntry> + '_ {
        self.entries.iter().filter_map(GroupEntry::as_panel)
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels().count()
    }

    #[must_use]
    pub fn panel(&self, child_id: &str) -> Option<&PanelEntry> {
        self.panels().find(|panel| panel.child_id == child_id)
    }

    /// Sum of every entry's size, panels and resizers alike.
    #[must_use]
    pub fn total_size(&self) -> f64 {
        self.entries.iter().map(GroupEntry::size).sum()
    }

    /// Entry indices of every resizer.
    pub fn resizer_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.is_resizer().then_some(index))
    }

    /// Check the alternation invariant: the sequence starts and ends with a
    /// panel and panels and resizers strictly alternate.
    pub fn validate(&self) -> Result<(), StructureError> {
        if let Some(first) = self.entries.first()
            && first.is_resizer()
        {
            return Err(StructureError::LeadingResizer);
        }
        if let Some(last) = self.entries.last()
            && last.is_resizer()
        {
            return Err(StructureError::TrailingResizer);
        }
        for (index, pair) in self.entries.windows(2).enumerate() {
            match (&pair[0], &pair[1]) {
                (GroupEntry::Resizer(_), GroupEntry::Resizer(_)) => {
                    return Err(StructureError::AdjacentResizers { index: index + 1 });
                }
                (GroupEntry::Panel(_), GroupEntry::Panel(_)) => {
                    return Err(StructureError::AdjacentPanels { index: index + 1 });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_panels() -> GroupState {
        GroupState::new("g:test", 1000.0, Orientation::Horizontal)
            .with_panel(PanelEntry::new("a", 300.0))
            .with_resizer(5.0)
            .with_panel(PanelEntry::new("b", 390.0).with_flex(true))
            .with_resizer(5.0)
            .with_panel(PanelEntry::new("c", 300.0))
    }

    #[test]
    fn total_size_counts_resizers() {
        assert_eq!(three_panels().total_size(), 1000.0);
    }

    #[test]
    fn panels_skip_resizers() {
        let group = three_panels();
        let ids: Vec<_> = group.panels().map(|p| p.child_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(group.resizer_indices().collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn alternating_sequence_validates() {
        assert_eq!(three_panels().validate(), Ok(()));
        assert_eq!(
            GroupState::new("g:empty", 0.0, Orientation::Vertical).validate(),
            Ok(())
        );
    }

    #[test]
    fn structural_violations_are_reported() {
        let leading = GroupState::new("g:x", 100.0, Orientation::Horizontal)
            .with_resizer(4.0)
            .with_panel(PanelEntry::new("a", 96.0));
        assert_eq!(leading.validate(), Err(StructureError::LeadingResizer));

        let trailing = GroupState::new("g:x", 100.0, Orientation::Horizontal)
            .with_panel(PanelEntry::new("a", 96.0))
            .with_resizer(4.0);
        assert_eq!(trailing.validate(), Err(StructureError::TrailingResizer));

        let doubled = GroupState::new("g:x", 100.0, Orientation::Horizontal)
            .with_panel(PanelEntry::new("a", 46.0))
            .with_resizer(4.0)
            .with_resizer(4.0)
            .with_panel(PanelEntry::new("b", 46.0));
        assert_eq!(
            doubled.validate(),
            Err(StructureError::AdjacentResizers { index: 2 })
        );
    }

    #[test]
    fn room_is_never_negative() {
        let squeezed = PanelEntry::new("a", 10.0)
            .with_min_size(20.0)
            .with_max_size(5.0);
        assert_eq!(squeezed.collapse_room(), 0.0);
        assert_eq!(squeezed.expand_room(), 0.0);
    }
}
