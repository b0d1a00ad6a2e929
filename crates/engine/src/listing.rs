use firestocks_core::RemoteDocument;
use firestocks_ports::DocumentStore;

use crate::cancel::Cancellation;
use crate::error::{Phase, SyncError, SyncResult};

/// Read a whole collection, following page tokens
pub async fn list_all(
    store: &dyn DocumentStore,
    collection: &str,
    page_size: usize,
    cancel: &Cancellation,
    phase: Phase,
) -> SyncResult<Vec<RemoteDocument>> {
    if page_size == 0 {
        return Err(SyncError::Precondition(
            "listing page size must be at least 1".to_string(),
        ));
    }

    let mut documents = Vec::new();
    let mut token = None;
    loop {
        cancel.check(phase)?;
        let page = store
            .list_page(collection, page_size, token)
            .await
            .map_err(SyncError::store(phase))?;
        documents.extend(page.documents);

        match page.next_page_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    log::debug!("Listed {} documents from '{}'", documents.len(), collection);
    Ok(documents)
}
