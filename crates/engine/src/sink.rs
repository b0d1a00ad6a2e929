//! Batch sinks - one atomic store batch per chunk
//!
//! The writer and updater compose `chunk → for each chunk: sink.write(chunk)`
//! explicitly through `drain`; a sink only knows how to turn one chunk into
//! one committed batch.

use async_trait::async_trait;
use firestocks_core::{DocumentHandle, Fields, WriteBatch};
use firestocks_ports::DocumentStore;
use log::debug;

use crate::cancel::Cancellation;
use crate::chunk::chunk;
use crate::error::{Phase, SyncError, SyncResult};

/// Strategy for committing one chunk as one atomic batch
#[async_trait]
pub trait BatchSink<T: Send + 'static>: Send + Sync {
    /// Phase reported when this sink fails
    fn phase(&self) -> Phase;

    /// Commit `chunk` as a single batch
    async fn write(&self, chunk: Vec<T>) -> SyncResult<()>;
}

/// Creates one new document per payload in a collection
pub struct CreateSink<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> CreateSink<'a> {
    pub fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }
}

#[async_trait]
impl<'a> BatchSink<Fields> for CreateSink<'a> {
    fn phase(&self) -> Phase {
        Phase::Write
    }

    async fn write(&self, chunk: Vec<Fields>) -> SyncResult<()> {
        let mut batch = WriteBatch::with_capacity(chunk.len());
        for fields in chunk {
            batch.create(self.collection, fields);
        }
        self.store
            .commit(batch)
            .await
            .map_err(SyncError::store(Phase::Write))
    }
}

/// Merges fields into existing documents
pub struct MergeSink<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> MergeSink<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a> BatchSink<(DocumentHandle, Fields)> for MergeSink<'a> {
    fn phase(&self) -> Phase {
        Phase::Update
    }

    async fn write(&self, chunk: Vec<(DocumentHandle, Fields)>) -> SyncResult<()> {
        let mut batch = WriteBatch::with_capacity(chunk.len());
        for (handle, fields) in chunk {
            batch.merge(handle, fields);
        }
        self.store
            .commit(batch)
            .await
            .map_err(SyncError::store(Phase::Update))
    }
}

/// Chunk `items` and hand the chunks to `sink` in input order
///
/// Each chunk commits atomically; a failure on chunk k leaves chunks before
/// it committed. Returns the number of committed batches.
pub async fn drain<T: Send + 'static>(
    items: Vec<T>,
    max_batch_size: usize,
    sink: &dyn BatchSink<T>,
    cancel: &Cancellation,
) -> SyncResult<usize> {
    let chunks = chunk(items, max_batch_size)?;
    let total = chunks.len();

    for (n, chunk) in chunks.into_iter().enumerate() {
        cancel.check(sink.phase())?;
        let size = chunk.len();
        sink.write(chunk).await?;
        debug!("[{}] committed batch {}/{} ({} ops)", sink.phase(), n + 1, total, size);
    }

    Ok(total)
}
