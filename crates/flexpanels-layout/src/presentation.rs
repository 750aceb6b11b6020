//! Pixel sizes to percentages, flex shorthands and resizer slider bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::group::{GroupEntry, GroupState};
use crate::resize::{collapse_capacity, expansion_capacity};

/// Which bound stopped a resizer movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintHit {
    /// A panel on the collapsing side reached its minimum.
    Min,
    /// A panel on the expanding side reached its maximum.
    Max,
}

impl ConstraintHit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Presentation values for one panel and the resizer that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayout {
    /// Panel size as a percentage of the container.
    pub percentage: f64,
    pub flex: bool,
    /// Lowest absolute position the following resizer can reach.
    pub aria_min: f64,
    /// Highest absolute position the following resizer can reach.
    pub aria_max: f64,
    /// Current absolute position of the following resizer.
    pub aria_now: f64,
}

impl PanelLayout {
    /// The CSS `flex` shorthand for this panel.
    #[must_use]
    pub fn flex_value(&self) -> String {
        flex_shorthand(self.flex, self.percentage)
    }
}

/// Computed layout for a whole group, keyed by child id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupLayout {
    pub panels: BTreeMap<String, PanelLayout>,
    #[serde(rename = "isConstrained")]
    pub constraint: Option<ConstraintHit>,
}

impl GroupLayout {
    #[must_use]
    pub fn panel(&self, child_id: &str) -> Option<&PanelLayout> {
        self.panels.get(child_id)
    }

    /// `(child_id, flex shorthand)` for every panel.
    pub fn flex_values(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.panels
            .iter()
            .map(|(child_id, panel)| (child_id.as_str(), panel.flex_value()))
    }
}

/// `"1"` for the flexible panel, `"0 0 <percentage>%"` otherwise.
#[must_use]
pub fn flex_shorthand(flex: bool, percentage: f64) -> String {
    if flex {
        "1".to_owned()
    } else {
        format!("0 0 {percentage}%")
    }
}

/// Derive percentages and resizer bounds from a measured group without
/// moving anything.
///
/// Each panel's ARIA values describe the resizer immediately after it: its
/// current position is the cumulative length up to the panel's end, and its
/// reachable range is bounded by the collapse/expand capacity on either side.
#[must_use]
pub fn convert_group_state_to_layout(group: &GroupState) -> GroupLayout {
    let mut panels = BTreeMap::new();
    let mut position = 0.0;

    for (index, entry) in group.entries.iter().enumerate() {
        match entry {
            GroupEntry::Resizer(resizer) => position += resizer.size,
            GroupEntry::Panel(panel) => {
                let percentage = if group.size > 0.0 {
                    panel.size / group.size * 100.0
                } else {
                    0.0
                };
                let before = &group.entries[..=index];
                let after = &group.entries[index + 1..];
                let backward = collapse_capacity(before).min(expansion_capacity(after));
                let forward = expansion_capacity(before).min(collapse_capacity(after));

                position += panel.size;
                panels.insert(
                    panel.child_id.clone(),
                    PanelLayout {
                        percentage,
                        flex: panel.flex,
                        aria_min: position - backward,
                        aria_max: position + forward,
                        aria_now: position,
                    },
                );
            }
        }
    }

    GroupLayout {
        panels,
        constraint: None,
    }
}
