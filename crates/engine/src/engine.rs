//! SyncEngine - the passes built from the batching components

use std::sync::Arc;

use firestocks_core::{Fields, InstrumentRecord};
use firestocks_ports::{Clock, DocumentStore, PriceLookup, SymbolReference};
use log::{debug, info};

use crate::cancel::Cancellation;
use crate::config::SyncConfig;
use crate::error::{Phase, SyncResult};
use crate::export::TagExport;
use crate::listing::list_all;
use crate::matcher::{DocumentMatcher, MatchOutcome};
use crate::projector::{Diagnostic, Projection, RecordProjector};
use crate::reconcile::UpdatePlanner;
use crate::updater::{BatchUpdater, UpdateSummary};
use crate::writer::{BatchWriter, WriteSummary, check_batch_size};

/// What a pass did to the store
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Documents written to the stocks collection by full writes
    pub stocks: WriteSummary,
    /// Documents written to the tags collection
    pub tags: WriteSummary,
    /// Instruments that were missing remotely and got created
    pub created_missing: Vec<String>,
    /// Merges into existing stock documents
    pub updated: UpdateSummary,
    /// Missing prices and similar non-fatal findings
    pub diagnostics: Vec<Diagnostic>,
}

/// Batched synchronization of a local snapshot into a document store
///
/// One engine serves one logical worker. Several engines may run side by
/// side only on disjoint instrument shards.
pub struct SyncEngine {
    store: Arc<dyn DocumentStore>,
    projector: RecordProjector,
    config: SyncConfig,
    cancel: Cancellation,
}

impl SyncEngine {
    /// Create an engine; fails on invalid configuration before any I/O
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> SyncResult<Self> {
        config.validate()?;
        check_batch_size(store.as_ref(), config.max_batch_size)?;

        Ok(Self {
            store,
            projector: RecordProjector::new(clock),
            config,
            cancel: Cancellation::new(),
        })
    }

    /// Observe `cancel` between store calls
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn writer(&self) -> BatchWriter<'_> {
        BatchWriter::new(self.store.as_ref(), &self.cancel, self.config.purge_page_size)
    }

    fn matcher(&self) -> DocumentMatcher<'_> {
        DocumentMatcher::new(self.store.as_ref(), &self.cancel, self.config.list_page_size)
    }

    /// Full payloads for `records`, numbered from zero
    fn full_payloads(
        &self,
        records: &[InstrumentRecord],
        prices: &dyn PriceLookup,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Fields> {
        records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let Projection {
                    fields,
                    diagnostics: found,
                } = self.projector.full_payload(position, record, prices);
                diagnostics.extend(found);
                fields
            })
            .collect()
    }

    /// Replace the tags collection with every known classification
    pub async fn write_tags(&self, reference: &dyn SymbolReference) -> SyncResult<WriteSummary> {
        let payloads = reference
            .tag_collections()
            .iter()
            .map(|tags| tags.to_fields())
            .collect();
        self.writer()
            .write(
                &self.config.tags_collection,
                payloads,
                self.config.max_batch_size,
                true,
            )
            .await
    }

    /// Wipe and rewrite the stocks collection, then replace the tags
    pub async fn rebuild(
        &self,
        records: &[InstrumentRecord],
        prices: &dyn PriceLookup,
        reference: &dyn SymbolReference,
    ) -> SyncResult<PassReport> {
        let mut report = PassReport::default();
        let payloads = self.full_payloads(records, prices, &mut report.diagnostics);

        info!("Delete old data and add {} stocks", payloads.len());
        report.stocks = self
            .writer()
            .write(
                &self.config.stocks_collection,
                payloads,
                self.config.max_batch_size,
                true,
            )
            .await?;
        report.tags = self.write_tags(reference).await?;
        Ok(report)
    }

    /// Records with no document in the stocks collection
    pub async fn find_missing<'r>(
        &self,
        records: &'r [InstrumentRecord],
    ) -> SyncResult<MatchOutcome<'r>> {
        self.matcher()
            .match_records(records, &self.config.stocks_collection)
            .await
    }

    /// Bring every record of this shard up to date
    ///
    /// Missing records are appended (no wipe) and, when this engine owns the
    /// tags, the tags collection is replaced; then the collection is re-listed and every record receives a merge. Every merge
    /// is planned before the first batch is committed.
    pub async fn sync(
        &self,
        records: &[InstrumentRecord],
        prices: &dyn PriceLookup,
        reference: &dyn SymbolReference,
    ) -> SyncResult<PassReport> {
        let mut report = PassReport::default();

        let outcome = self.find_missing(records).await?;
        if !outcome.missing.is_empty() {
            let missing = outcome.missing_records();
            info!("Add {} missing stocks", missing.len());
            report.created_missing = missing.iter().map(|r| r.name().to_string()).collect();

            let payloads = self.full_payloads(&missing, prices, &mut report.diagnostics);
            report.stocks = self
                .writer()
                .write(
                    &self.config.stocks_collection,
                    payloads,
                    self.config.max_batch_size,
                    false,
                )
                .await?;
            if self.config.owns_tags {
                report.tags = self.write_tags(reference).await?;
            } else {
                debug!("Not the tags owner, leaving '{}' alone", self.config.tags_collection);
            }
        }

        let index = self.matcher().index(&self.config.stocks_collection).await?;
        let plan = UpdatePlanner::new(&self.projector, prices).plan_records(records, &index)?;
        report.diagnostics.extend(plan.diagnostics);

        info!("Sync {} stocks with the store", plan.items.len());
        report.updated = BatchUpdater::new(self.store.as_ref(), &self.cancel)
            .update(plan.items, self.config.max_batch_size)
            .await?;
        Ok(report)
    }

    /// Merge fresh fields into every document of the stocks collection
    ///
    /// `records` must be the whole snapshot: a document naming no local
    /// record fails the pass with `Reconciliation` before any batch is sent.
    pub async fn refresh(
        &self,
        records: &[InstrumentRecord],
        prices: &dyn PriceLookup,
    ) -> SyncResult<PassReport> {
        let documents = list_all(
            self.store.as_ref(),
            &self.config.stocks_collection,
            self.config.list_page_size,
            &self.cancel,
            Phase::Match,
        )
        .await?;
        let plan = UpdatePlanner::new(&self.projector, prices).plan_documents(&documents, records)?;

        info!("Refresh {} stock documents", plan.items.len());
        let mut report = PassReport {
            diagnostics: plan.diagnostics,
            ..PassReport::default()
        };
        report.updated = BatchUpdater::new(self.store.as_ref(), &self.cancel)
            .update(plan.items, self.config.max_batch_size)
            .await?;
        Ok(report)
    }

    /// Replace `collection` with `documents`
    pub async fn replace_collection(
        &self,
        collection: &str,
        documents: Vec<Fields>,
    ) -> SyncResult<WriteSummary> {
        self.writer()
            .write(collection, documents, self.config.max_batch_size, true)
            .await
    }

    /// Replace the strategies collection with `documents`
    pub async fn import_strategies(&self, documents: Vec<Fields>) -> SyncResult<WriteSummary> {
        let collection = self.config.strategies_collection.clone();
        self.replace_collection(&collection, documents).await
    }

    /// Read stocks and tags back and build the tag file contents
    pub async fn export_tags(&self) -> SyncResult<TagExport> {
        let store = self.store.as_ref();
        let page = self.config.list_page_size;
        let tag_docs = list_all(store, &self.config.tags_collection, page, &self.cancel, Phase::Export).await?;
        let stock_docs =
            list_all(store, &self.config.stocks_collection, page, &self.cancel, Phase::Export).await?;
        Ok(TagExport::from_documents(&stock_docs, &tag_docs))
    }
}
