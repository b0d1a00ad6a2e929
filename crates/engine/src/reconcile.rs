//! Update planning - every merge is computed before the first batch goes out

use std::collections::HashMap;

use firestocks_core::{DocumentHandle, Fields, InstrumentRecord, RemoteDocument};
use firestocks_ports::PriceLookup;

use crate::error::{SyncError, SyncResult};
use crate::matcher::RemoteIndex;
use crate::projector::{Diagnostic, RecordProjector};

/// Merges ready for the Batch Updater
#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    pub items: Vec<(DocumentHandle, Fields)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UpdatePlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pairs local records with remote handles and projects their update fields
pub struct UpdatePlanner<'a> {
    projector: &'a RecordProjector,
    prices: &'a dyn PriceLookup,
}

impl<'a> UpdatePlanner<'a> {
    pub fn new(projector: &'a RecordProjector, prices: &'a dyn PriceLookup) -> Self {
        Self { projector, prices }
    }

    /// Plan updates for records that must already exist remotely
    ///
    /// A record without a remote document is an upstream data problem and
    /// fails the whole plan with `UnknownRemoteRecord`.
    pub fn plan_records(
        &self,
        records: &[InstrumentRecord],
        index: &RemoteIndex,
    ) -> SyncResult<UpdatePlan> {
        let mut plan = UpdatePlan::default();
        for record in records {
            let doc = index
                .get(record.name())
                .ok_or_else(|| SyncError::UnknownRemoteRecord {
                    name: record.name().to_string(),
                })?;
            self.push(&mut plan, doc.handle.clone(), record);
        }
        Ok(plan)
    }

    /// Plan updates for specific remote documents
    ///
    /// Every document must name a local record; otherwise the plan fails with
    /// `Reconciliation` carrying the unmatched key.
    pub fn plan_documents(
        &self,
        documents: &[RemoteDocument],
        records: &[InstrumentRecord],
    ) -> SyncResult<UpdatePlan> {
        let by_name: HashMap<&str, &InstrumentRecord> =
            records.iter().map(|record| (record.name(), record)).collect();

        let mut plan = UpdatePlan::default();
        for doc in documents {
            let key = doc
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| doc.handle.to_string());
            let record = doc
                .name()
                .and_then(|name| by_name.get(name))
                .ok_or(SyncError::Reconciliation { key })?;
            self.push(&mut plan, doc.handle.clone(), record);
        }
        Ok(plan)
    }

    fn push(&self, plan: &mut UpdatePlan, handle: DocumentHandle, record: &InstrumentRecord) {
        let projection = self.projector.update_fields(record, self.prices);
        plan.diagnostics.extend(projection.diagnostics);
        plan.items.push((handle, projection.fields));
    }
}
