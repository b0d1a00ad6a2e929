use std::sync::Arc;

use async_trait::async_trait;
use firestocks_core::{DocumentHandle, Fields, RemoteDocument, WriteBatch, WriteOp};
use firestocks_ports::{DocumentPage, DocumentStore, StoreError, StoreResult};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::config::FirestoreConfig;
use crate::error::RestError;
use crate::value::{decode_fields, encode_fields, field_path};
use crate::wire::{
    CommitRequest, DocumentMask, ErrorEnvelope, ListResponse, Precondition, WireDocument, Write,
};

/// Writes Firestore accepts in one commit
pub const MAX_BATCH_SIZE: usize = 500;

static CLIENT: OnceCell<Arc<FirestoreClient>> = OnceCell::new();

/// Process-wide client, created on first use
///
/// Later calls return the same client; a differing `config` is ignored with
/// a warning.
pub fn connect(config: &FirestoreConfig) -> StoreResult<Arc<FirestoreClient>> {
    let client = CLIENT.get_or_try_init(|| FirestoreClient::new(config.clone()).map(Arc::new))?;
    if client.config() != config {
        warn!(
            "Firestore already connected to project '{}', ignoring new settings",
            client.config().project_id
        );
    }
    Ok(Arc::clone(client))
}

/// REST client for one Firestore database
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn write_for(&self, op: WriteOp) -> Write {
        match op {
            WriteOp::Create { collection, fields } => {
                let id = Uuid::new_v4().simple().to_string();
                Write {
                    update: self.wire_document(&collection, &id, &fields),
                    update_mask: None,
                    current_document: Precondition { exists: false },
                }
            }
            WriteOp::Merge { handle, fields } => {
                let field_paths = fields.keys().map(|key| field_path(key)).collect();
                Write {
                    update: self.wire_document(&handle.collection, &handle.id, &fields),
                    update_mask: Some(DocumentMask { field_paths }),
                    current_document: Precondition { exists: true },
                }
            }
        }
    }

    fn wire_document(&self, collection: &str, id: &str, fields: &Fields) -> WireDocument {
        WireDocument {
            name: self.config.document_name(collection, id),
            fields: encode_fields(fields),
        }
    }

    fn remote_document(collection: &str, doc: WireDocument) -> Result<RemoteDocument, RestError> {
        let id = doc
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RestError::Parse(format!("bad document name '{}'", doc.name)))?;
        let fields = decode_fields(&doc.fields)?;
        Ok(RemoteDocument::new(DocumentHandle::new(collection, id), fields))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.config.url(resource);
        let resp = self
            .request(self.client.get(&url))
            .query(query)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T, RestError> {
        let url = self.config.url(resource);
        let resp = self
            .request(self.client.post(&url))
            .json(body)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn delete<T: DeserializeOwned>(&self, resource: &str) -> Result<T, RestError> {
        let url = self.config.url(resource);
        let resp = self.request(self.client.delete(&url)).send().await?;

        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, RestError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
                return Err(RestError::Api {
                    code: envelope.error.code,
                    status: envelope.error.status,
                    message: envelope.error.message,
                });
            }
            return Err(RestError::Api {
                code: status.as_u16(),
                status: status.to_string(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RestError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_page(
        &self,
        collection: &str,
        page_size: usize,
        page_token: Option<String>,
    ) -> StoreResult<DocumentPage> {
        let resource = format!("{}/{}", self.config.documents_root(), collection);
        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let resp: ListResponse = self.get(&resource, &query).await?;
        let documents = resp
            .documents
            .into_iter()
            .map(|doc| Self::remote_document(collection, doc))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Listed {} documents from '{}'", documents.len(), collection);
        Ok(DocumentPage {
            documents,
            next_page_token: resp.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    async fn delete_document(&self, handle: &DocumentHandle) -> StoreResult<()> {
        let name = self.config.document_name(&handle.collection, &handle.id);
        let _: serde_json::Value = self.delete(&name).await?;
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        if batch.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge {
                ops: batch.len(),
                max: MAX_BATCH_SIZE,
            });
        }
        if batch.is_empty() {
            return Ok(());
        }

        let request = CommitRequest {
            writes: batch.into_ops().into_iter().map(|op| self.write_for(op)).collect(),
        };
        let resource = format!("{}:commit", self.config.documents_root());
        let _: serde_json::Value = self.post(&resource, &request).await?;

        debug!("Committed {} writes", request.writes.len());
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    fn name(&self) -> &str {
        "Firestore"
    }
}
