//! Inline hydration script.
//!
//! Server-rendered groups start at their default sizes. The script returned
//! by [`hydrate_script`] is embedded as the first child of every group; it
//! runs as soon as the parser reaches it, reads the durably stored snapshot
//! for the parent group and writes the stored flex values as custom
//! properties before first paint, so restored layouts do not flash.

use crate::config::StoreConfig;

/// Attribute carrying the namespaced group id on a group element.
pub const GROUP_ID_ATTRIBUTE: &str = "data-group-id";

fn js_string(value: &str) -> String {
    // A JSON string literal is a valid JS string literal.
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Script text restoring stored flex values onto `document.currentScript`'s
/// parent group.
#[must_use]
pub fn hydrate_script(config: &StoreConfig) -> String {
    let storage_prefix = js_string(&config.storage_prefix);
    let child_flex_prefix = js_string(&config.child_flex_prefix);
    format!(
        r#"
(() => {{
  const groupElm = document.currentScript.parentElement;
  const storedValue = window.localStorage.getItem({storage_prefix} + groupElm.dataset.groupId);
  if (storedValue) {{
    const parsedValue = JSON.parse(storedValue);
    for (const [childId, flexValue] of Object.entries(parsedValue.flexValues)) {{
      groupElm.style.setProperty({child_flex_prefix} + childId, flexValue);
    }}
  }}
}})();
"#
    )
}
