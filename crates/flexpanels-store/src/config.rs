/// Prefix of every durable storage key written by the store.
pub const DEFAULT_STORAGE_PREFIX: &str = "--fp-";

/// Prefix of the per-child flex custom property set on a group element.
pub const CHILD_FLEX_PROPERTY_PREFIX: &str = "--fp-flex-";

/// Snapshot store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prepended to a group id to form its durable storage key.
    pub storage_prefix: String,
    /// Prepended to a child id to form its flex custom property.
    pub child_flex_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
            child_flex_prefix: CHILD_FLEX_PROPERTY_PREFIX.to_owned(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn storage_key(&self, id: &str) -> String {
        format!("{}{id}", self.storage_prefix)
    }

    /// The group id a storage key belongs to, if it carries our prefix.
    #[must_use]
    pub fn id_for_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.storage_prefix.as_str())
    }

    #[must_use]
    pub fn child_flex_property(&self, child_id: &str) -> String {
        format!("{}{child_id}", self.child_flex_prefix)
    }
}
