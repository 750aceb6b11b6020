//! Namespaced group identifiers.
//!
//! Ids supplied by the caller (a persistence id) are stored as `p:<id>` and
//! survive reloads; ids generated for anonymous groups are stored as
//! `g:<id>` and are garbage collected with their last subscriber.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const PERSISTENT_ID_PREFIX: &str = "p:";
pub const GENERATED_ID_PREFIX: &str = "g:";

/// A group id carrying its persistence namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Namespace `id` as persistent or generated.
    #[must_use]
    pub fn new(id: &str, persistent: bool) -> Self {
        let prefix = if persistent {
            PERSISTENT_ID_PREFIX
        } else {
            GENERATED_ID_PREFIX
        };
        Self(format!("{prefix}{id}"))
    }

    #[must_use]
    pub fn persistent(id: &str) -> Self {
        Self::new(id, true)
    }

    #[must_use]
    pub fn generated(id: &str) -> Self {
        Self::new(id, false)
    }

    /// Wrap an already namespaced id, e.g. one read back from a
    /// `data-group-id` attribute.
    #[must_use]
    pub fn from_namespaced(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        is_persistent_id(&self.0)
    }

    /// Prefix for child ids allocated inside this group: the namespaced id
    /// with `:` replaced by `-`, so it is usable in element ids and custom
    /// property names.
    #[must_use]
    pub fn child_id_prefix(&self) -> String {
        self.0.replacen(':', "-", 1)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

#[must_use]
pub fn is_persistent_id(id: &str) -> bool {
    id.starts_with(PERSISTENT_ID_PREFIX)
}
