//! Batch Updater - field merges into already-identified documents

use firestocks_core::{DocumentHandle, Fields};
use firestocks_ports::DocumentStore;
use log::info;

use crate::cancel::Cancellation;
use crate::error::SyncResult;
use crate::sink::{MergeSink, drain};
use crate::writer::check_batch_size;

/// Outcome of one `BatchUpdater::update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub batches: usize,
    pub documents: usize,
}

/// Merges field mappings into existing documents in bounded batches
///
/// Fields not named in a mapping are left untouched on the document.
pub struct BatchUpdater<'a> {
    store: &'a dyn DocumentStore,
    cancel: &'a Cancellation,
}

impl<'a> BatchUpdater<'a> {
    pub fn new(store: &'a dyn DocumentStore, cancel: &'a Cancellation) -> Self {
        Self { store, cancel }
    }

    pub async fn update(
        &self,
        items: Vec<(DocumentHandle, Fields)>,
        max_batch_size: usize,
    ) -> SyncResult<UpdateSummary> {
        check_batch_size(self.store, max_batch_size)?;

        let documents = items.len();
        let sink = MergeSink::new(self.store);
        let batches = drain(items, max_batch_size, &sink, self.cancel).await?;

        info!("Merged updates into {} documents in {} batches", documents, batches);
        Ok(UpdateSummary { batches, documents })
    }
}
