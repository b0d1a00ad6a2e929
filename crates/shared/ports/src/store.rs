use async_trait::async_trait;
use firestocks_core::{DocumentHandle, RemoteDocument, WriteBatch};

use crate::error::StoreResult;

/// One page of a collection listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub documents: Vec<RemoteDocument>,
    /// Token for the following page, `None` on the last page
    pub next_page_token: Option<String>,
}

impl DocumentPage {
    pub fn is_last(&self) -> bool {
        self.next_page_token.is_none()
    }
}

/// Port for a schemaless remote document store
///
/// Every call is a network round trip. The store is expected to provide:
/// - paginated listing of a collection
/// - single document deletion
/// - atomic batches of create / merge writes, bounded by `max_batch_size`
///
/// It is not expected to answer "which documents are missing" queries; the
/// engine does absence detection itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List up to `page_size` documents of `collection`, starting after
    /// `page_token` (from the start when `None`)
    async fn list_page(
        &self,
        collection: &str,
        page_size: usize,
        page_token: Option<String>,
    ) -> StoreResult<DocumentPage>;

    /// Delete a single document
    async fn delete_document(&self, handle: &DocumentHandle) -> StoreResult<()>;

    /// Commit every operation of `batch` atomically
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Largest number of operations the store accepts in one batch
    fn max_batch_size(&self) -> usize;

    /// Store name/identifier for logging
    fn name(&self) -> &str {
        "DocumentStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure the trait stays object-safe
    fn _assert_store_object_safe(_: &dyn DocumentStore) {}

    #[test]
    fn test_last_page() {
        assert!(DocumentPage::default().is_last());
        let page = DocumentPage {
            documents: Vec::new(),
            next_page_token: Some("0050".to_string()),
        };
        assert!(!page.is_last());
    }
}
