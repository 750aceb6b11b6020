//! The measurement and mutation interface a host environment provides.
//!
//! Nothing in this crate touches a real document. A browser host forwards
//! these calls to `getComputedStyle`, `offsetWidth`, `style.setProperty`
//! and friends; [`crate::MemoryDom`] implements them in memory.

use std::fmt;

use flexpanels_layout::{Orientation, resolve_length};

use crate::constants::{CLASS_PANEL, CLASS_RESIZER};

/// Host-side element access.
///
/// Reads take `&self` and must reflect every write made so far (the host
/// performs whatever reflow it needs before answering).
pub trait DomHost {
    /// Opaque element handle.
    type Element: Clone + PartialEq + fmt::Debug;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;
    /// Element children in document order.
    fn children(&self, element: &Self::Element) -> Vec<Self::Element>;
    /// Upper-case tag name (`"DIV"`, `"SCRIPT"`).
    fn tag_name(&self, element: &Self::Element) -> String;
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    /// Rounded border-box length along `orientation`'s axis
    /// (`offsetWidth` / `offsetHeight`).
    fn offset_size(&self, element: &Self::Element, orientation: Orientation) -> f64;
    /// Computed value of a CSS property; empty when the host has none.
    fn computed_style(&self, element: &Self::Element, property: &str) -> String;
    /// Inline style property, including custom properties.
    fn style_property(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_style_property(&mut self, element: &Self::Element, name: &str, value: &str);
    fn remove_style_property(&mut self, element: &Self::Element, name: &str);
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);
    /// Add or remove a class on the document body.
    fn set_body_class(&mut self, class: &str, enabled: bool);
    fn active_element(&self) -> Option<Self::Element>;
    fn blur(&mut self, element: &Self::Element);
}

/// Whether `element`'s computed text direction is right-to-left.
pub fn is_rtl<H: DomHost>(host: &H, element: &H::Element) -> bool {
    host.computed_style(element, "direction") == "rtl"
}

/// Border plus padding along the main axis; a panel can never be smaller.
pub fn main_axis_overhead<H: DomHost>(
    host: &H,
    element: &H::Element,
    orientation: Orientation,
) -> f64 {
    let (start, end) = match orientation {
        Orientation::Horizontal => ("left", "right"),
        Orientation::Vertical => ("top", "bottom"),
    };
    [
        format!("border-{start}-width"),
        format!("border-{end}-width"),
        format!("padding-{start}"),
        format!("padding-{end}"),
    ]
    .iter()
    .filter_map(|property| resolve_length(&host.computed_style(element, property), 0.0))
    .filter(|pixels| *pixels > 0.0)
    .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Backward,
    Forward,
}

fn adjacent_panel<H: DomHost>(host: &H, resizer: &H::Element, walk: Walk) -> Option<H::Element> {
    let parent = host.parent(resizer)?;
    let siblings = host.children(&parent);
    let position = siblings.iter().position(|sibling| sibling == resizer)?;
    let candidates: Vec<&H::Element> = match walk {
        Walk::Backward => siblings[..position].iter().rev().collect(),
        Walk::Forward => siblings[position + 1..].iter().collect(),
    };
    for sibling in candidates {
        if host.has_class(sibling, CLASS_RESIZER) {
            return None;
        }
        if host.has_class(sibling, CLASS_PANEL) {
            return Some(sibling.clone());
        }
    }
    None
}

/// The nearest panel before `resizer`, stopping at another resizer.
pub fn preceding_panel<H: DomHost>(host: &H, resizer: &H::Element) -> Option<H::Element> {
    adjacent_panel(host, resizer, Walk::Backward)
}

/// The nearest panel after `resizer`, stopping at another resizer.
pub fn following_panel<H: DomHost>(host: &H, resizer: &H::Element) -> Option<H::Element> {
    adjacent_panel(host, resizer, Walk::Forward)
}
