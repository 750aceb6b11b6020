//! The persisted and shared unit of layout state.

use std::collections::BTreeMap;

use flexpanels_layout::GroupLayout;
use serde::{Deserialize, Serialize};

/// Committed flex shorthands for one group, keyed by child id.
///
/// Serialised as `{"flexValues": {"<childId>": "<flex shorthand>"}}`; the
/// shorthand is `"1"` for the flexible panel and `"0 0 <percentage>%"`
/// for fixed ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePanelInfo {
    pub flex_values: BTreeMap<String, String>,
}

impl StorePanelInfo {
    /// Drop ARIA and constraint data, keeping only what is persisted.
    #[must_use]
    pub fn from_layout(layout: &GroupLayout) -> Self {
        Self {
            flex_values: layout
                .flex_values()
                .map(|(child_id, value)| (child_id.to_owned(), value))
                .collect(),
        }
    }

    #[must_use]
    pub fn flex_value(&self, child_id: &str) -> Option<&str> {
        self.flex_values.get(child_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flex_values.is_empty()
    }
}
