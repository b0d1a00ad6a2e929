//! Sync engine configuration

use crate::error::{SyncError, SyncResult};

/// Tunables of the sync engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Operations per atomic batch; must not exceed the store's own limit
    pub max_batch_size: usize,
    /// Documents listed (and deleted) per purge round
    pub purge_page_size: usize,
    /// Documents per listing page when reading a whole collection
    pub list_page_size: usize,
    /// Collection holding one document per instrument
    pub stocks_collection: String,
    /// Collection holding one document per tag type
    pub tags_collection: String,
    /// Collection holding imported strategy documents
    pub strategies_collection: String,
    /// Whether a sync pass that adds instruments also rewrites the tags
    /// collection. At most one worker of a sharded run may own the tags.
    pub owns_tags: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 400,
            purge_page_size: 50,
            list_page_size: 300,
            stocks_collection: "stocks".to_string(),
            tags_collection: "tags".to_string(),
            strategies_collection: "strategies".to_string(),
            owns_tags: false,
        }
    }
}

impl SyncConfig {
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_purge_page_size(mut self, size: usize) -> Self {
        self.purge_page_size = size;
        self
    }

    pub fn with_list_page_size(mut self, size: usize) -> Self {
        self.list_page_size = size;
        self
    }

    pub fn with_tag_ownership(mut self, owns_tags: bool) -> Self {
        self.owns_tags = owns_tags;
        self
    }

    /// Reject sizes of zero and empty collection names
    pub fn validate(&self) -> SyncResult<()> {
        for (what, size) in [
            ("max_batch_size", self.max_batch_size),
            ("purge_page_size", self.purge_page_size),
            ("list_page_size", self.list_page_size),
        ] {
            if size == 0 {
                return Err(SyncError::Precondition(format!("{what} must be at least 1")));
            }
        }

        for (what, name) in [
            ("stocks_collection", &self.stocks_collection),
            ("tags_collection", &self.tags_collection),
            ("strategies_collection", &self.strategies_collection),
        ] {
            if name.trim().is_empty() {
                return Err(SyncError::Precondition(format!("{what} must not be empty")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_batch_size, 400);
        assert_eq!(config.purge_page_size, 50);
        assert!(!config.owns_tags);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = SyncConfig::default().with_max_batch_size(0);
        assert!(matches!(config.validate(), Err(SyncError::Precondition(_))));
    }

    #[test]
    fn test_empty_collection_rejected() {
        let config = SyncConfig {
            tags_collection: " ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tags_collection"));
    }
}
