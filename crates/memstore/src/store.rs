use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use firestocks_core::{DocumentHandle, Fields, RemoteDocument, WriteBatch, WriteOp};
use firestocks_ports::{DocumentPage, DocumentStore, StoreError, StoreResult};
use log::debug;
use tokio::sync::RwLock;

/// Batch limit of Firestore, used unless configured otherwise
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Documents of one collection, keyed by id in creation order
type Collection = BTreeMap<String, Fields>;

/// Document store held entirely in memory
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Collection>>,
    max_batch_size: usize,
    next_id: AtomicU64,

    /// 1-based commit call that fails, if any
    fail_commit_at: Option<usize>,
    /// 1-based delete call that fails, if any
    fail_delete_at: Option<usize>,

    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    commit_calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            next_id: AtomicU64::new(1),
            fail_commit_at: None,
            fail_delete_at: None,
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            commit_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Make the `n`-th commit call (1-based) fail without applying anything
    pub fn with_failing_commit(mut self, n: usize) -> Self {
        self.fail_commit_at = Some(n);
        self
    }

    /// Make the `n`-th delete call (1-based) fail
    pub fn with_failing_delete(mut self, n: usize) -> Self {
        self.fail_delete_at = Some(n);
        self
    }

    /// Ids sort in creation order
    fn allocate_id(&self) -> String {
        format!("{:020}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Insert a document directly, bypassing batches and call counters
    pub async fn insert(&self, collection: &str, fields: Fields) -> DocumentHandle {
        let id = self.allocate_id();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        DocumentHandle::new(collection, id)
    }

    /// Every document of `collection`, in creation order
    pub async fn documents(&self, collection: &str) -> Vec<RemoteDocument> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| {
                        RemoteDocument::new(DocumentHandle::new(collection, id), fields.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fields of one document
    pub async fn get(&self, handle: &DocumentHandle) -> Option<Fields> {
        let collections = self.collections.read().await;
        collections
            .get(&handle.collection)
            .and_then(|docs| docs.get(&handle.id))
            .cloned()
    }

    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_page(
        &self,
        collection: &str,
        page_size: usize,
        page_token: Option<String>,
    ) -> StoreResult<DocumentPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if page_size == 0 {
            return Err(StoreError::Rejected {
                code: 400,
                message: "page size must be positive".to_string(),
            });
        }

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(DocumentPage::default());
        };

        let mut remaining = docs
            .iter()
            .filter(|(id, _)| page_token.as_ref().is_none_or(|token| id.as_str() > token.as_str()));

        let documents: Vec<RemoteDocument> = remaining
            .by_ref()
            .take(page_size)
            .map(|(id, fields)| RemoteDocument::new(DocumentHandle::new(collection, id), fields.clone()))
            .collect();

        let next_page_token = match (remaining.next(), documents.last()) {
            (Some(_), Some(last)) => Some(last.handle.id.clone()),
            _ => None,
        };

        Ok(DocumentPage {
            documents,
            next_page_token,
        })
    }

    async fn delete_document(&self, handle: &DocumentHandle) -> StoreResult<()> {
        let call = self.delete_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_delete_at == Some(call) {
            return Err(StoreError::Request(format!("injected failure deleting {handle}")));
        }

        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(&handle.collection) {
            docs.remove(&handle.id);
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let call = self.commit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if batch.len() > self.max_batch_size {
            return Err(StoreError::BatchTooLarge {
                ops: batch.len(),
                max: self.max_batch_size,
            });
        }
        if self.fail_commit_at == Some(call) {
            return Err(StoreError::Request(format!("injected failure on commit {call}")));
        }

        let mut collections = self.collections.write().await;

        // Every merge target must exist before anything is applied
        for op in batch.ops() {
            if let WriteOp::Merge { handle, .. } = op {
                let exists = collections
                    .get(&handle.collection)
                    .is_some_and(|docs| docs.contains_key(&handle.id));
                if !exists {
                    return Err(StoreError::NotFound(handle.to_string()));
                }
            }
        }

        let ops = batch.len();
        for op in batch.into_ops() {
            match op {
                WriteOp::Create { collection, fields } => {
                    let id = self.allocate_id();
                    collections.entry(collection).or_default().insert(id, fields);
                }
                WriteOp::Merge { handle, fields } => {
                    if let Some(doc) = collections
                        .get_mut(&handle.collection)
                        .and_then(|docs| docs.get_mut(&handle.id))
                    {
                        doc.extend(fields);
                    }
                }
            }
        }

        debug!("Committed batch {} with {} ops", call, ops);
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    fn name(&self) -> &str {
        "MemoryStore"
    }
}
