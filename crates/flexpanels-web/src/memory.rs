//! In-memory [`DomHost`] laid out with taffy's flexbox.
//!
//! `MemoryDom` keeps an element arena and re-runs layout after every
//! mutation, so reads always observe the effect of earlier writes, the way a
//! browser forces a synchronous reflow on `offsetWidth`.
//!
//! - top-level elements take the size given to [`MemoryDom::set_size`];
//! - each group is converted to a one-level taffy tree: resizers are
//!   inflexible items of their fixed length, panels resolve `--fp-flex`
//!   through `var(--fp-flex-<id>, <fallback>)` into grow/shrink/basis and
//!   carry their min/max, padding and borders;
//! - nested groups are laid out recursively, one tree per group.
//!
//! Only the stylesheet rules the core relies on are modelled in
//! [`DomHost::computed_style`]: `flex-direction` from the orientation class,
//! inherited `direction`, min/max lengths from `--fp-min-size` and
//! `--fp-max-size`, and zero padding and borders unless overridden.

use std::collections::BTreeMap;

use flexpanels_layout::{Orientation, resolve_length, resolve_max_length, resolve_min_length};
use flexpanels_store::{GroupId, StoreConfig, StorePanelInfo, hydrate_script};
use rustc_hash::FxHashMap;
use taffy::geometry::{Rect, Size};
use taffy::style::{AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, Style};
use taffy::{TaffyResult, TaffyTree};
use tracing::warn;

use crate::constants::{
    CLASS_PANEL, CLASS_PANEL_GROUP, CLASS_RESIZER, CLASS_VERTICAL, CSS_PROP_FLEX,
    CSS_PROP_MAX_SIZE, CSS_PROP_MIN_SIZE, GROUP_ID_ATTRIBUTE, SCRIPT_TAG,
};
use crate::dom::{DomHost, main_axis_overhead};
use crate::extract::group_orientation;
use crate::markup::{
    ChildIdAllocator, PanelOptions, group_attributes, group_style, panel_attributes,
    panel_classes, panel_style, resizer_attributes,
};

/// Main-axis length given to resizers that were not sized explicitly.
pub const DEFAULT_RESIZER_SIZE: f64 = 6.0;

/// Handle of one element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    computed: BTreeMap<String, String>,
    text: String,
    explicit_size: Option<(f64, f64)>,
    /// Border-box `(width, height)` from the last reflow.
    box_size: (f64, f64),
}

fn axis_size<T>(orientation: Orientation, main: T, cross: T) -> Size<T> {
    match orientation {
        Orientation::Horizontal => Size {
            width: main,
            height: cross,
        },
        Orientation::Vertical => Size {
            width: cross,
            height: main,
        },
    }
}

/// A resolved length, with `f64::INFINITY` meaning no limit.
fn pixels(length: f64) -> Dimension {
    if length.is_finite() {
        Dimension::length(length as f32)
    } else {
        Dimension::auto()
    }
}

/// `flex-grow`/`flex-shrink` factor; invalid or negative factors are zero.
fn flex_factor(value: &str) -> f32 {
    value
        .parse::<f32>()
        .ok()
        .filter(|factor| factor.is_finite() && *factor >= 0.0)
        .unwrap_or(0.0)
}

fn flex_basis(value: &str, main: f64) -> Dimension {
    if let Some(percentage) = value.strip_suffix('%')
        && let Ok(percentage) = percentage.trim().parse::<f32>()
    {
        return Dimension::percent(percentage / 100.0);
    }
    resolve_length(value, main).map_or(Dimension::auto(), |length| Dimension::length(length as f32))
}

const fn main_of(orientation: Orientation, size: (f64, f64)) -> f64 {
    match orientation {
        Orientation::Horizontal => size.0,
        Orientation::Vertical => size.1,
    }
}

/// Element arena rooted at a `BODY` element.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    body: NodeId,
    active: Option<NodeId>,
    config: StoreConfig,
    allocators: FxHashMap<NodeId, ChildIdAllocator>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// A document whose markup builders use `config`'s property prefixes.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        let body = Node {
            tag: "BODY".to_owned(),
            ..Node::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            active: None,
            config,
            allocators: FxHashMap::default(),
        }
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub fn body_has_class(&self, class: &str) -> bool {
        self.has_class(&self.body, class)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Create an element and append it to `parent`.
    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_uppercase(),
            ..Node::default()
        });
        self.attach(parent, id, None);
        self.reflow();
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        self.detach(child);
        let children = &mut self.node_mut(parent).children;
        let position = position.map_or(children.len(), |position| position.min(children.len()));
        children.insert(position, child);
        self.node_mut(child).parent = Some(parent);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|sibling| *sibling != child);
        }
    }

    /// Move `child` (attached or not) to the end of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child, None);
        self.reflow();
    }

    /// Move `child` to `position` among `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeId, position: usize, child: NodeId) {
        self.attach(parent, child, Some(position));
        self.reflow();
    }

    /// Detach `child` from the tree. The handle stays valid and can be
    /// re-inserted later.
    pub fn remove(&mut self, child: NodeId) {
        self.detach(child);
        if self.active == Some(child) {
            self.active = None;
        }
        self.reflow();
    }

    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current == self.body
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.node_mut(node).classes;
        if !classes.iter().any(|existing| existing == class) {
            classes.push(class.to_owned());
        }
        self.reflow();
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).classes.retain(|existing| existing != class);
        self.reflow();
    }

    /// Border-box size of a top-level element (or of a resizer, whose main
    /// axis length is taken from it).
    pub fn set_size(&mut self, node: NodeId, width: f64, height: f64) {
        self.node_mut(node).explicit_size = Some((width, height));
        self.reflow();
    }

    /// Force a computed style value, as a stylesheet rule would.
    pub fn set_computed_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.node_mut(node)
            .computed
            .insert(property.to_owned(), value.to_owned());
        self.reflow();
    }

    pub fn focus(&mut self, node: NodeId) {
        self.active = Some(node);
    }

    #[must_use]
    pub fn text_content(&self, node: NodeId) -> &str {
        &self.node(node).text
    }

    /// Unrounded border-box `(width, height)`.
    #[must_use]
    pub fn box_size(&self, node: NodeId) -> (f64, f64) {
        self.node(node).box_size
    }

    fn set_classes(&mut self, node: NodeId, classes: &str) {
        self.node_mut(node).classes = classes.split_whitespace().map(str::to_owned).collect();
    }

    fn write_declarations(&mut self, node: NodeId, style: Vec<(String, String)>) {
        self.node_mut(node).style.extend(style);
    }

    fn write_attributes(&mut self, node: NodeId, attributes: Vec<(&'static str, String)>) {
        self.node_mut(node)
            .attributes
            .extend(attributes.into_iter().map(|(name, value)| (name.to_owned(), value)));
    }

    fn allocator(&mut self, group: NodeId) -> &mut ChildIdAllocator {
        let id = self
            .attribute(&group, GROUP_ID_ATTRIBUTE)
            .map(GroupId::from_namespaced)
            .unwrap_or_else(|| GroupId::generated(&group.0.to_string()));
        self.allocators
            .entry(group)
            .or_insert_with(|| ChildIdAllocator::new(&id))
    }

    fn build_group(
        &mut self,
        parent: NodeId,
        id: &GroupId,
        orientation: Orientation,
        snapshot: Option<&StorePanelInfo>,
        panel: Option<&PanelOptions>,
    ) -> NodeId {
        let node = self.create_element(parent, "DIV");
        let class_name = panel.and_then(|options| options.class_name.as_deref());
        self.set_classes(node, &panel_classes(Some(orientation), class_name));
        let style = group_style(orientation, snapshot, &self.config);
        self.write_declarations(node, style);
        self.write_attributes(node, group_attributes(id, snapshot));
        if let Some(options) = panel {
            let child_id = self.allocator(parent).next_child_id(options.index.as_deref());
            let style = panel_style(&child_id, options, &self.config);
            self.write_declarations(node, style);
            self.write_attributes(node, panel_attributes(&child_id, options));
        }
        self.allocators.insert(node, ChildIdAllocator::new(id));

        let script = self.create_element(node, SCRIPT_TAG);
        self.node_mut(script).text = hydrate_script(&self.config);
        self.reflow();
        node
    }

    /// Render a top-level group container.
    ///
    /// `snapshot` is the store's current value for `id`, if any; it is
    /// written into the group's inline style and marks the group dirty.
    pub fn create_group(
        &mut self,
        parent: NodeId,
        id: &GroupId,
        orientation: Orientation,
        snapshot: Option<&StorePanelInfo>,
    ) -> NodeId {
        self.build_group(parent, id, orientation, snapshot, None)
    }

    /// Render a group that is itself a panel of `parent`.
    pub fn create_nested_group(
        &mut self,
        parent: NodeId,
        id: &GroupId,
        orientation: Orientation,
        snapshot: Option<&StorePanelInfo>,
        options: &PanelOptions,
    ) -> NodeId {
        self.build_group(parent, id, orientation, snapshot, Some(options))
    }

    /// Render a leaf panel inside `group`.
    pub fn create_panel(&mut self, group: NodeId, options: PanelOptions) -> NodeId {
        let node = self.create_element(group, "DIV");
        let child_id = self.allocator(group).next_child_id(options.index.as_deref());
        self.set_classes(node, &panel_classes(None, options.class_name.as_deref()));
        let style = panel_style(&child_id, &options, &self.config);
        self.write_declarations(node, style);
        self.write_attributes(node, panel_attributes(&child_id, &options));
        self.reflow();
        node
    }

    /// Render a resizer at the end of `group`.
    pub fn create_resizer(&mut self, group: NodeId) -> NodeId {
        let node = self.create_element(group, "DIV");
        self.set_classes(node, CLASS_RESIZER);
        let orientation = self
            .has_class(&group, CLASS_PANEL_GROUP)
            .then(|| group_orientation(self, &group));
        self.write_attributes(node, resizer_attributes(orientation));
        self.reflow();
        node
    }

    /// End of the initial render of `group`: later panels without an index
    /// are reported as conditional.
    pub fn freeze_child_ids(&mut self, group: NodeId) {
        self.allocator(group).freeze();
    }

    /// Resolve `var(--name, fallback)` against `node`'s inherited custom
    /// properties.
    fn resolve_var(&self, node: NodeId, value: &str) -> String {
        let value = value.trim();
        let Some(inner) = value
            .strip_prefix("var(")
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return value.to_owned();
        };
        let (name, fallback) = match inner.split_once(',') {
            Some((name, fallback)) => (name.trim(), Some(fallback.trim())),
            None => (inner.trim(), None),
        };
        match self.custom_property(node, name) {
            Some(found) => self.resolve_var(node, &found),
            None => fallback.map(|fallback| self.resolve_var(node, fallback)).unwrap_or_default(),
        }
    }

    fn custom_property(&self, node: NodeId, name: &str) -> Option<String> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(value) = self.node(id).style.get(name) {
                return Some(value.clone());
            }
            current = self.node(id).parent;
        }
        None
    }

    fn inherited_computed(&self, node: NodeId, property: &str) -> Option<String> {
        let mut current = Some(node);
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(value) = node.computed.get(property).or_else(|| node.style.get(property)) {
                return Some(value.clone());
            }
            current = node.parent;
        }
        None
    }

    /// Axis of the group `node` is a panel of, if any.
    fn parent_axis(&self, node: NodeId) -> Option<Orientation> {
        let parent = self.node(node).parent?;
        self.has_class(&parent, CLASS_PANEL_GROUP)
            .then(|| group_orientation(self, &parent))
    }

    fn panel_constraint(&self, node: NodeId, property: &str) -> String {
        let (axis, is_min) = match property {
            "min-width" => (Orientation::Horizontal, true),
            "min-height" => (Orientation::Vertical, true),
            "max-width" => (Orientation::Horizontal, false),
            _ => (Orientation::Vertical, false),
        };
        let on_main_axis = self.has_class(&node, CLASS_PANEL) && self.parent_axis(node) == Some(axis);
        let declared = on_main_axis
            .then(|| {
                let custom = if is_min { CSS_PROP_MIN_SIZE } else { CSS_PROP_MAX_SIZE };
                self.node(node).style.get(custom).map(|value| self.resolve_var(node, value))
            })
            .flatten();
        match (declared.as_deref(), is_min) {
            (None | Some("0" | "" | "auto"), true) => "0px".to_owned(),
            (None | Some("auto" | "" | "none"), false) => "none".to_owned(),
            (Some(value), _) if value.parse::<f64>().is_ok() => format!("{value}px"),
            (Some(value), _) => value.to_owned(),
        }
    }

    /// `padding-*` or `border-*-width` edges of `node` as taffy lengths.
    fn box_edges(&self, node: NodeId, prefix: &str, suffix: &str) -> Rect<LengthPercentage> {
        let side = |side: &str| {
            let value = self.computed_style(&node, &format!("{prefix}{side}{suffix}"));
            LengthPercentage::length(resolve_length(&value, 0.0).unwrap_or(0.0).max(0.0) as f32)
        };
        Rect {
            left: side("left"),
            right: side("right"),
            top: side("top"),
            bottom: side("bottom"),
        }
    }

    /// Flex item style for one child of a group whose content box is `main`
    /// long on the main axis.
    fn item_style(&self, child: NodeId, orientation: Orientation, main: f64) -> Style {
        let node = self.node(child);
        if node.tag == SCRIPT_TAG {
            return Style {
                display: Display::None,
                ..Style::default()
            };
        }
        let explicit_main = node.explicit_size.map(|size| main_of(orientation, size));
        let mut style = Style {
            flex_shrink: 0.0,
            padding: self.box_edges(child, "padding-", ""),
            border: self.box_edges(child, "border-", "-width"),
            ..Style::default()
        };
        if !self.has_class(&child, CLASS_PANEL) {
            let fallback = if self.has_class(&child, CLASS_RESIZER) {
                DEFAULT_RESIZER_SIZE
            } else {
                0.0
            };
            style.flex_basis = Dimension::length(explicit_main.unwrap_or(fallback) as f32);
            return style;
        }

        let (min_property, max_property) = match orientation {
            Orientation::Horizontal => ("min-width", "max-width"),
            Orientation::Vertical => ("min-height", "max-height"),
        };
        let min = resolve_min_length(&self.computed_style(&child, min_property), main);
        let max = resolve_max_length(&self.computed_style(&child, max_property), main).max(min);
        style.min_size = axis_size(orientation, pixels(min), Dimension::auto());
        style.max_size = axis_size(orientation, pixels(max), Dimension::auto());

        let flex = node
            .style
            .get(CSS_PROP_FLEX)
            .map(|value| self.resolve_var(child, value))
            .unwrap_or_default();
        let parts: Vec<&str> = flex.split_whitespace().collect();
        match parts.as_slice() {
            [grow] if flex_factor(grow) > 0.0 => {
                style.flex_grow = flex_factor(grow);
                style.flex_shrink = 1.0;
                style.flex_basis = Dimension::percent(0.0);
            }
            [grow, shrink, basis] => {
                style.flex_grow = flex_factor(grow);
                style.flex_shrink = flex_factor(shrink);
                style.flex_basis = flex_basis(basis, main);
            }
            _ => style.flex_basis = Dimension::length(explicit_main.unwrap_or(0.0) as f32),
        }
        style
    }

    /// Lay out the children of `group` in a single-level taffy tree.
    fn measure_group(&self, group: NodeId) -> TaffyResult<Vec<(NodeId, (f64, f64))>> {
        let orientation = group_orientation(self, &group);
        let (width, height) = self.node(group).box_size;
        let overhead = main_axis_overhead(self, &group, orientation);
        let main = (main_of(orientation, (width, height)) - overhead).max(0.0);
        let children = self.node(group).children.clone();

        let mut tree: TaffyTree<()> = TaffyTree::new();
        tree.disable_rounding();
        let leaves = children
            .iter()
            .map(|&child| tree.new_leaf(self.item_style(child, orientation, main)))
            .collect::<TaffyResult<Vec<_>>>()?;
        let root = tree.new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: match orientation {
                    Orientation::Horizontal => FlexDirection::Row,
                    Orientation::Vertical => FlexDirection::Column,
                },
                size: Size {
                    width: Dimension::length(width as f32),
                    height: Dimension::length(height as f32),
                },
                padding: self.box_edges(group, "padding-", ""),
                border: self.box_edges(group, "border-", "-width"),
                ..Style::default()
            },
            &leaves,
        )?;
        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(width as f32),
                height: AvailableSpace::Definite(height as f32),
            },
        )?;

        children
            .into_iter()
            .zip(leaves)
            .map(|(child, leaf)| {
                let size = tree.layout(leaf)?.size;
                Ok((child, (f64::from(size.width), f64::from(size.height))))
            })
            .collect()
    }

    fn reflow(&mut self) {
        let mut pending = Vec::new();
        for child in self.node(self.body).children.clone() {
            let node = self.node_mut(child);
            node.box_size = node.explicit_size.unwrap_or_default();
            pending.push(child);
        }
        while let Some(node) = pending.pop() {
            if self.has_class(&node, CLASS_PANEL_GROUP) {
                match self.measure_group(node) {
                    Ok(sizes) => {
                        for (child, size) in sizes {
                            self.node_mut(child).box_size = size;
                            pending.push(child);
                        }
                    }
                    Err(err) => warn!(group = node.0, error = %err, "flex layout failed"),
                }
            } else {
                for child in self.node(node).children.clone() {
                    let child_node = self.node_mut(child);
                    child_node.box_size = child_node.explicit_size.unwrap_or_default();
                    pending.push(child);
                }
            }
        }
    }
}

impl DomHost for MemoryDom {
    type Element = NodeId;

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.node(*element).parent
    }

    fn children(&self, element: &NodeId) -> Vec<NodeId> {
        self.node(*element).children.clone()
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.node(*element).tag.clone()
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.node(*element).classes.iter().any(|existing| existing == class)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element).attributes.get(name).cloned()
    }

    fn offset_size(&self, element: &NodeId, orientation: Orientation) -> f64 {
        main_of(orientation, self.node(*element).box_size).round()
    }

    fn computed_style(&self, element: &NodeId, property: &str) -> String {
        let node = self.node(*element);
        if property == "direction" {
            return self
                .inherited_computed(*element, property)
                .unwrap_or_else(|| "ltr".to_owned());
        }
        if let Some(value) = node.computed.get(property) {
            return value.clone();
        }
        match property {
            "flex-direction" => node.style.get(property).cloned().unwrap_or_else(|| {
                if self.has_class(element, CLASS_VERTICAL) {
                    "column".to_owned()
                } else {
                    "row".to_owned()
                }
            }),
            "min-width" | "min-height" | "max-width" | "max-height" => {
                self.panel_constraint(*element, property)
            }
            _ if property.starts_with("padding-") || property.starts_with("border-") => {
                "0px".to_owned()
            }
            _ => node
                .style
                .get(property)
                .map(|value| self.resolve_var(*element, value))
                .unwrap_or_default(),
        }
    }

    fn style_property(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element).style.get(name).cloned()
    }

    fn set_style_property(&mut self, element: &NodeId, name: &str, value: &str) {
        self.node_mut(*element)
            .style
            .insert(name.to_owned(), value.to_owned());
        self.reflow();
    }

    fn remove_style_property(&mut self, element: &NodeId, name: &str) {
        self.node_mut(*element).style.remove(name);
        self.reflow();
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        self.node_mut(*element)
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    fn set_body_class(&mut self, class: &str, enabled: bool) {
        let body = self.body;
        let classes = &mut self.node_mut(body).classes;
        let present = classes.iter().any(|existing| existing == class);
        if enabled && !present {
            classes.push(class.to_owned());
        } else if !enabled {
            classes.retain(|existing| existing != class);
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn blur(&mut self, element: &NodeId) {
        if self.active == Some(*element) {
            self.active = None;
        }
    }
}
