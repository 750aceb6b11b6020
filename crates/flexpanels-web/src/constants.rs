//! Class names, attributes and custom properties shared with the markup
//! layer and the stylesheet.

pub use flexpanels_store::{CHILD_FLEX_PROPERTY_PREFIX, GROUP_ID_ATTRIBUTE};

// Classes
pub const CLASS_PANEL: &str = "fp-panel";
pub const CLASS_PANEL_GROUP: &str = "fp-panel-group";
pub const CLASS_RESIZER: &str = "fp-resizer";
pub const CLASS_VERTICAL: &str = "fp-vertical";
pub const CLASS_HORIZONTAL: &str = "fp-horizontal";
pub const CLASS_RESIZING: &str = "fp-resizing";
pub const CLASS_CONSTRAINED_MIN: &str = "fp-constrained-min";
pub const CLASS_CONSTRAINED_MAX: &str = "fp-constrained-max";

// Custom properties
pub const CSS_PROP_FLEX: &str = "--fp-flex";
pub const CSS_PROP_MIN_SIZE: &str = "--fp-min-size";
pub const CSS_PROP_MAX_SIZE: &str = "--fp-max-size";

// Attributes
pub const ATTR_CHILD_ID: &str = "data-child-id";
pub const ATTR_FLEX: &str = "data-flex";
pub const ATTR_DIRTY: &str = "data-dirty";
pub const ATTR_ID: &str = "id";

pub const SCRIPT_TAG: &str = "SCRIPT";

/// Body classes toggled while a drag is in progress.
pub const DRAG_BODY_CLASSES: [&str; 5] = [
    CLASS_RESIZING,
    CLASS_VERTICAL,
    CLASS_HORIZONTAL,
    CLASS_CONSTRAINED_MIN,
    CLASS_CONSTRAINED_MAX,
];
