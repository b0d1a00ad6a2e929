//! Collection Purger - removes every document of a collection

use firestocks_ports::DocumentStore;
use log::{debug, info};

use crate::cancel::Cancellation;
use crate::error::{Phase, SyncError, SyncResult};

/// Pages through a collection deleting documents until it is empty
///
/// Only documents that existed when the purge started are covered; writers
/// adding documents concurrently are outside the contract.
pub struct CollectionPurger<'a> {
    store: &'a dyn DocumentStore,
    cancel: &'a Cancellation,
}

impl<'a> CollectionPurger<'a> {
    pub fn new(store: &'a dyn DocumentStore, cancel: &'a Cancellation) -> Self {
        Self { store, cancel }
    }

    /// Delete every document in `collection`, `page_size` at a time
    ///
    /// Stops after the first page that yields fewer than `page_size`
    /// deletions. Returns the number of deleted documents. A failed delete
    /// aborts the purge and leaves the collection in an unknown state.
    pub async fn purge(&self, collection: &str, page_size: usize) -> SyncResult<usize> {
        if page_size == 0 {
            return Err(SyncError::Precondition(
                "purge page size must be at least 1".to_string(),
            ));
        }

        let mut total = 0;
        loop {
            self.cancel.check(Phase::Purge)?;
            let page = self
                .store
                .list_page(collection, page_size, None)
                .await
                .map_err(SyncError::store(Phase::Purge))?;

            let mut deleted = 0;
            for doc in &page.documents {
                self.cancel.check(Phase::Purge)?;
                self.store
                    .delete_document(&doc.handle)
                    .await
                    .map_err(SyncError::store(Phase::Purge))?;
                deleted += 1;
            }
            total += deleted;
            debug!("Deleted {} documents from '{}' this page", deleted, collection);

            if deleted < page_size {
                break;
            }
        }

        info!("Purged {} documents from '{}'", total, collection);
        Ok(total)
    }
}
