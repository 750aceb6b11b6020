//! Restoring a stored layout onto server-rendered markup.
//!
//! This is the host-side counterpart of
//! [`flexpanels_store::hydrate_script`]: the embedded script does the same
//! thing in the page before first paint, while [`hydrate_group`] serves
//! hosts that render without running scripts.

use flexpanels_layout::StructureError;
use flexpanels_store::{StorageBackend, StoreConfig, StoreError, StorePanelInfo};
use tracing::debug;

use crate::apply::apply_snapshot_to_group;
use crate::constants::GROUP_ID_ATTRIBUTE;
use crate::dom::DomHost;
use crate::error::ResizeError;

/// Read the durable snapshot for `group`'s id from `storage` and write its
/// flex values onto the group.
///
/// Returns `Ok(false)` when nothing is stored. Generated ids are looked up
/// too; they are simply never written, so the lookup misses.
pub fn hydrate_group<H: DomHost>(
    host: &mut H,
    storage: &dyn StorageBackend,
    config: &StoreConfig,
    group: &H::Element,
) -> Result<bool, ResizeError> {
    let id = host
        .attribute(group, GROUP_ID_ATTRIBUTE)
        .filter(|id| !id.is_empty())
        .ok_or(StructureError::MissingGroupId)?;

    let Some(raw) = storage
        .get_item(&config.storage_key(&id))
        .map_err(StoreError::from)?
    else {
        return Ok(false);
    };
    let snapshot: StorePanelInfo =
        serde_json::from_str(&raw).map_err(|err| StoreError::Decode {
            id: id.clone(),
            message: err.to_string(),
        })?;

    apply_snapshot_to_group(host, config, group, &snapshot);
    debug!(id = %id, panels = snapshot.flex_values.len(), "hydrated group");
    Ok(true)
}
