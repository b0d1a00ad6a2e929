//! Batch Writer - full (re)population of a collection

use firestocks_core::Fields;
use firestocks_ports::DocumentStore;
use log::info;

use crate::cancel::Cancellation;
use crate::error::{SyncError, SyncResult};
use crate::purge::CollectionPurger;
use crate::sink::{CreateSink, drain};

/// Outcome of one `BatchWriter::write`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Documents deleted before writing
    pub purged: usize,
    /// Committed batches
    pub batches: usize,
    /// Created documents
    pub documents: usize,
}

/// Writes payloads as new documents, optionally wiping the collection first
pub struct BatchWriter<'a> {
    store: &'a dyn DocumentStore,
    cancel: &'a Cancellation,
    purge_page_size: usize,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a dyn DocumentStore, cancel: &'a Cancellation, purge_page_size: usize) -> Self {
        Self {
            store,
            cancel,
            purge_page_size,
        }
    }

    /// Purge (when `wipe_first`), then create one document per payload in
    /// batches of at most `max_batch_size`
    ///
    /// Call with `wipe_first` at most once per logical pass: a retry after a
    /// partial failure must not wipe the chunks that already landed.
    pub async fn write(
        &self,
        collection: &str,
        payloads: Vec<Fields>,
        max_batch_size: usize,
        wipe_first: bool,
    ) -> SyncResult<WriteSummary> {
        check_batch_size(self.store, max_batch_size)?;

        let purged = if wipe_first {
            CollectionPurger::new(self.store, self.cancel)
                .purge(collection, self.purge_page_size)
                .await?
        } else {
            0
        };

        let documents = payloads.len();
        let sink = CreateSink::new(self.store, collection);
        let batches = drain(payloads, max_batch_size, &sink, self.cancel).await?;

        info!(
            "Wrote {} documents to '{}' in {} batches",
            documents, collection, batches
        );

        Ok(WriteSummary {
            purged,
            batches,
            documents,
        })
    }
}

/// Reject batch sizes the store cannot take, before any I/O
pub(crate) fn check_batch_size(store: &dyn DocumentStore, max_batch_size: usize) -> SyncResult<()> {
    if max_batch_size == 0 {
        return Err(SyncError::Precondition(
            "max batch size must be at least 1".to_string(),
        ));
    }
    if max_batch_size > store.max_batch_size() {
        return Err(SyncError::Precondition(format!(
            "max batch size {} exceeds the limit of {} ({})",
            max_batch_size,
            store.max_batch_size(),
            store.name()
        )));
    }
    Ok(())
}
