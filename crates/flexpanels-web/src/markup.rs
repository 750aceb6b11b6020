//! Markup descriptors for panels, groups and resizers.
//!
//! A rendering layer (server templates, a component framework, or
//! [`crate::MemoryDom`]) turns these into elements. Everything the layout
//! core later reads back (classes, data attributes, custom properties) is
//! produced here, so the two sides cannot drift apart.

use flexpanels_layout::Orientation;
use flexpanels_store::{GroupId, StoreConfig, StorePanelInfo};
use tracing::warn;

use crate::constants::{
    ATTR_CHILD_ID, ATTR_DIRTY, ATTR_FLEX, ATTR_ID, CLASS_HORIZONTAL, CLASS_PANEL,
    CLASS_PANEL_GROUP, CLASS_VERTICAL, CSS_PROP_FLEX, CSS_PROP_MAX_SIZE, CSS_PROP_MIN_SIZE,
    GROUP_ID_ATTRIBUTE,
};

/// Ordered `(name, value)` pairs for an inline `style` attribute.
pub type StyleDeclarations = Vec<(String, String)>;

/// Ordered `(name, value)` attribute pairs.
pub type Attributes = Vec<(&'static str, String)>;

/// Default `--fp-min-size` when a panel declares none.
pub const DEFAULT_MIN_SIZE: &str = "0";
/// Default `--fp-max-size` when a panel declares none.
pub const DEFAULT_MAX_SIZE: &str = "auto";
/// Accessible name of every resizer.
pub const RESIZER_LABEL: &str = "Resize panels";

/// Authoring options of one panel.
///
/// Lengths are CSS text (`"240px"`, `"30%"`, `"calc(..)"`); the core only
/// ever reads them back as computed pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelOptions {
    /// Stable suffix for the child id. Required for panels that are rendered
    /// conditionally, so their id does not drift between renders.
    pub index: Option<String>,
    /// Fixed initial basis. `None` makes the panel flexible.
    pub initial_size: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub class_name: Option<String>,
}

impl PanelOptions {
    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    #[must_use]
    pub fn initial_size(mut self, size: impl Into<String>) -> Self {
        self.initial_size = Some(size.into());
        self
    }

    #[must_use]
    pub fn min_size(mut self, size: impl Into<String>) -> Self {
        self.min_size = Some(size.into());
        self
    }

    #[must_use]
    pub fn max_size(mut self, size: impl Into<String>) -> Self {
        self.max_size = Some(size.into());
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Panels without an initial size share the remaining space.
    #[must_use]
    pub fn is_flex(&self) -> bool {
        self.initial_size.is_none()
    }

    /// Flex shorthand used until a committed value exists.
    #[must_use]
    pub fn initial_flex_value(&self) -> String {
        match &self.initial_size {
            Some(size) => format!("0 0 {size}"),
            None => "1".to_owned(),
        }
    }
}

/// Per-group child id allocation.
///
/// Ids are `<group prefix>-<suffix>` where the suffix is the panel's
/// explicit index or a counter starting at 1. Once the first render is
/// finished the allocator is frozen; a counter id handed out after that
/// belongs to a conditionally rendered panel and is reported, because its
/// id depends on render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildIdAllocator {
    prefix: String,
    next: u64,
    frozen: bool,
}

impl ChildIdAllocator {
    #[must_use]
    pub fn new(group: &GroupId) -> Self {
        Self {
            prefix: group.child_id_prefix(),
            next: 1,
            frozen: false,
        }
    }

    pub fn next_child_id(&mut self, index: Option<&str>) -> String {
        let suffix = match index {
            Some(index) => index.to_owned(),
            None => {
                if self.frozen {
                    warn!(
                        prefix = %self.prefix,
                        "conditional panel detected after initial render; give conditional panels an explicit index"
                    );
                }
                let suffix = self.next.to_string();
                self.next += 1;
                suffix
            }
        };
        format!("{}-{suffix}", self.prefix)
    }

    /// Mark the initial render as complete.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// Space-joined class tokens, skipping absent and empty ones.
pub fn class_list<'a>(tokens: impl IntoIterator<Item = Option<&'a str>>) -> String {
    tokens
        .into_iter()
        .flatten()
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn orientation_class(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => CLASS_HORIZONTAL,
        Orientation::Vertical => CLASS_VERTICAL,
    }
}

/// Class attribute of a panel; `group` is the orientation when the panel
/// is itself a group container.
#[must_use]
pub fn panel_classes(group: Option<Orientation>, class_name: Option<&str>) -> String {
    class_list([
        Some(CLASS_PANEL),
        group.map(|_| CLASS_PANEL_GROUP),
        group.map(orientation_class),
        class_name,
    ])
}

/// Inline style of a panel inside a group.
///
/// `--fp-flex` falls back to the panel's initial flex value until the
/// group carries a committed `--fp-flex-<childId>` property.
#[must_use]
pub fn panel_style(child_id: &str, options: &PanelOptions, config: &StoreConfig) -> StyleDeclarations {
    vec![
        (
            CSS_PROP_FLEX.to_owned(),
            format!(
                "var({}, {})",
                config.child_flex_property(child_id),
                options.initial_flex_value()
            ),
        ),
        (
            CSS_PROP_MIN_SIZE.to_owned(),
            options
                .min_size
                .clone()
                .unwrap_or_else(|| DEFAULT_MIN_SIZE.to_owned()),
        ),
        (
            CSS_PROP_MAX_SIZE.to_owned(),
            options
                .max_size
                .clone()
                .unwrap_or_else(|| DEFAULT_MAX_SIZE.to_owned()),
        ),
    ]
}

/// Attributes of a panel inside a group.
#[must_use]
pub fn panel_attributes(child_id: &str, options: &PanelOptions) -> Attributes {
    vec![
        (ATTR_CHILD_ID, child_id.to_owned()),
        (ATTR_ID, child_id.to_owned()),
        (ATTR_FLEX, options.is_flex().to_string()),
    ]
}

/// Inline style of a group container: its main axis plus any committed
/// flex values, so a restored layout renders without a flash.
#[must_use]
pub fn group_style(
    orientation: Orientation,
    snapshot: Option<&StorePanelInfo>,
    config: &StoreConfig,
) -> StyleDeclarations {
    let direction = match orientation {
        Orientation::Horizontal => "row",
        Orientation::Vertical => "column",
    };
    let mut style = vec![("flex-direction".to_owned(), direction.to_owned())];
    if let Some(snapshot) = snapshot {
        style.extend(
            snapshot
                .flex_values
                .iter()
                .map(|(child_id, value)| (config.child_flex_property(child_id), value.clone())),
        );
    }
    style
}

/// Attributes of a group container.
#[must_use]
pub fn group_attributes(id: &GroupId, snapshot: Option<&StorePanelInfo>) -> Attributes {
    vec![
        (GROUP_ID_ATTRIBUTE, id.as_str().to_owned()),
        (ATTR_DIRTY, snapshot.is_some().to_string()),
    ]
}

/// Attributes of a resizer: a focusable separator labelled for assistive
/// technology, oriented like its group.
#[must_use]
pub fn resizer_attributes(orientation: Option<Orientation>) -> Attributes {
    let mut attributes = vec![
        ("role", "separator".to_owned()),
        ("tabindex", "0".to_owned()),
    ];
    if let Some(orientation) = orientation {
        attributes.push(("aria-orientation", orientation.as_str().to_owned()));
    }
    attributes.push(("aria-label", RESIZER_LABEL.to_owned()));
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn child_ids_use_counter_or_index() {
        let mut ids = ChildIdAllocator::new(&GroupId::persistent("main"));
        assert_eq!(ids.next_child_id(None), "p-main-1");
        assert_eq!(ids.next_child_id(Some("sidebar")), "p-main-sidebar");
        assert_eq!(ids.next_child_id(None), "p-main-2");
    }

    #[test]
    #[traced_test]
    fn counter_ids_after_freeze_warn() {
        let mut ids = ChildIdAllocator::new(&GroupId::generated("r3"));
        ids.next_child_id(None);
        ids.freeze();
        assert!(ids.is_frozen());
        assert_eq!(ids.next_child_id(Some("extra")), "g-r3-extra");
        assert!(!logs_contain("conditional panel detected"));
        assert_eq!(ids.next_child_id(None), "g-r3-2");
        assert!(logs_contain("conditional panel detected"));
    }

    #[test]
    fn class_list_skips_empty_tokens() {
        assert_eq!(class_list([Some("a"), None, Some(""), Some("b")]), "a b");
        assert_eq!(class_list([None, Some("")]), "");
        assert_eq!(
            panel_classes(Some(Orientation::Vertical), Some("sidebar")),
            "fp-panel fp-panel-group fp-vertical sidebar"
        );
        assert_eq!(panel_classes(None, None), "fp-panel");
    }

    #[test]
    fn panel_style_falls_back_to_initial_flex() {
        let config = StoreConfig::default();
        let fixed = PanelOptions::default().initial_size("240px").max_size("50%");
        assert_eq!(
            panel_style("g-a-1", &fixed, &config),
            vec![
                ("--fp-flex".to_owned(), "var(--fp-flex-g-a-1, 0 0 240px)".to_owned()),
                ("--fp-min-size".to_owned(), "0".to_owned()),
                ("--fp-max-size".to_owned(), "50%".to_owned()),
            ]
        );
        let flexible = PanelOptions::default();
        assert_eq!(
            panel_style("g-a-2", &flexible, &config)[0].1,
            "var(--fp-flex-g-a-2, 1)"
        );
        assert_eq!(
            panel_attributes("g-a-2", &flexible),
            vec![
                ("data-child-id", "g-a-2".to_owned()),
                ("id", "g-a-2".to_owned()),
                ("data-flex", "true".to_owned()),
            ]
        );
    }

    #[test]
    fn group_style_carries_committed_values() {
        let config = StoreConfig::default();
        let mut snapshot = StorePanelInfo::default();
        snapshot
            .flex_values
            .insert("p-x-1".into(), "0 0 25%".into());
        let style = group_style(Orientation::Vertical, Some(&snapshot), &config);
        assert_eq!(
            style,
            vec![
                ("flex-direction".to_owned(), "column".to_owned()),
                ("--fp-flex-p-x-1".to_owned(), "0 0 25%".to_owned()),
            ]
        );
        assert_eq!(
            group_attributes(&GroupId::persistent("x"), Some(&snapshot))[1],
            ("data-dirty", "true".to_owned())
        );
    }

    #[test]
    fn resizer_is_an_oriented_separator() {
        let attributes = resizer_attributes(Some(Orientation::Horizontal));
        assert!(attributes.contains(&("role", "separator".to_owned())));
        assert!(attributes.contains(&("tabindex", "0".to_owned())));
        assert!(attributes.contains(&("aria-orientation", "horizontal".to_owned())));
        assert!(attributes.contains(&("aria-label", "Resize panels".to_owned())));
        assert!(
            !resizer_attributes(None)
                .iter()
                .any(|(name, _)| *name == "aria-orientation")
        );
    }
}
