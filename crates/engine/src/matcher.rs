//! Document Matcher - classifies local records as present or missing remotely

use std::collections::{BTreeSet, HashMap};

use firestocks_core::{DocumentHandle, InstrumentRecord, RemoteDocument};
use firestocks_ports::DocumentStore;
use log::warn;

use crate::cancel::Cancellation;
use crate::error::{Phase, SyncResult};
use crate::listing::list_all;

/// Remote documents indexed by their `name` field
///
/// Built once per pass so each local record costs one lookup instead of a
/// scan of the whole listing.
#[derive(Debug, Clone, Default)]
pub struct RemoteIndex {
    by_name: HashMap<String, RemoteDocument>,
}

impl RemoteIndex {
    /// Index `documents` by name
    ///
    /// On duplicate names the first document listed wins and a warning is
    /// logged. Documents without a string `name` are skipped.
    pub fn build(documents: Vec<RemoteDocument>) -> Self {
        let mut by_name: HashMap<String, RemoteDocument> = HashMap::with_capacity(documents.len());
        for doc in documents {
            let Some(name) = doc.name().map(str::to_string) else {
                warn!("Document {} has no name field, ignoring it", doc.handle);
                continue;
            };
            if let Some(first) = by_name.get(&name) {
                warn!(
                    "Duplicate remote document for '{}': keeping {}, ignoring {}",
                    name, first.handle, doc.handle
                );
                continue;
            }
            by_name.insert(name, doc);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&RemoteDocument> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Local records split by whether a remote document carries their name
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome<'r> {
    /// Records with their remote document, in local order
    pub matched: Vec<(&'r InstrumentRecord, RemoteDocument)>,
    /// Records no remote document names, in local order
    pub missing: Vec<&'r InstrumentRecord>,
}

impl<'r> MatchOutcome<'r> {
    /// Names of every matched record mapped to its handle
    pub fn matched_handles(&self) -> HashMap<&'r str, &DocumentHandle> {
        self.matched
            .iter()
            .map(|(record, doc)| (record.name(), &doc.handle))
            .collect()
    }

    pub fn missing_names(&self) -> BTreeSet<&'r str> {
        self.missing.iter().map(|record| record.name()).collect()
    }

    /// Owned copies of the missing records
    pub fn missing_records(&self) -> Vec<InstrumentRecord> {
        self.missing.iter().map(|record| (*record).clone()).collect()
    }
}

/// Partition `records` against an index of the remote collection
pub fn partition<'r>(records: &'r [InstrumentRecord], index: &RemoteIndex) -> MatchOutcome<'r> {
    let mut outcome = MatchOutcome::default();
    for record in records {
        match index.get(record.name()) {
            Some(doc) => outcome.matched.push((record, doc.clone())),
            None => outcome.missing.push(record),
        }
    }
    outcome
}

/// Lists a remote collection once and matches local records against it
pub struct DocumentMatcher<'a> {
    store: &'a dyn DocumentStore,
    cancel: &'a Cancellation,
    page_size: usize,
}

impl<'a> DocumentMatcher<'a> {
    pub fn new(store: &'a dyn DocumentStore, cancel: &'a Cancellation, page_size: usize) -> Self {
        Self {
            store,
            cancel,
            page_size,
        }
    }

    /// Index the whole of `collection` by name
    pub async fn index(&self, collection: &str) -> SyncResult<RemoteIndex> {
        let documents =
            list_all(self.store, collection, self.page_size, self.cancel, Phase::Match).await?;
        Ok(RemoteIndex::build(documents))
    }

    pub async fn match_records<'r>(
        &self,
        records: &'r [InstrumentRecord],
        collection: &str,
    ) -> SyncResult<MatchOutcome<'r>> {
        let index = self.index(collection).await?;
        let outcome = partition(records, &index);
        log::info!(
            "Matched {} of {} instruments against '{}' ({} remote documents), {} missing",
            outcome.matched.len(),
            records.len(),
            collection,
            index.len(),
            outcome.missing.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firestocks_core::{Fields, Instrument};
    use serde_json::json;

    fn remote(id: &str, name: &str) -> RemoteDocument {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!(name));
        RemoteDocument::new(DocumentHandle::new("stocks", id), fields)
    }

    fn record(name: &str) -> InstrumentRecord {
        Instrument::new(name, "Germany").into()
    }

    #[test]
    fn test_partition_finds_missing() {
        let records = vec![record("A"), record("B"), record("C")];
        let index = RemoteIndex::build(vec![remote("1", "A"), remote("2", "C")]);

        let outcome = partition(&records, &index);

        assert_eq!(outcome.missing_names(), BTreeSet::from(["B"]));
        let handles = outcome.matched_handles();
        assert_eq!(handles["A"].id, "1");
        assert_eq!(handles["C"].id, "2");
        assert!(!handles.contains_key("B"));
    }

    #[test]
    fn test_duplicate_remote_names_keep_first() {
        let index = RemoteIndex::build(vec![remote("1", "A"), remote("2", "A")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("A").unwrap().handle.id, "1");
    }

    #[test]
    fn test_unnamed_documents_skipped() {
        let unnamed = RemoteDocument::new(DocumentHandle::new("stocks", "9"), Fields::new());
        let index = RemoteIndex::build(vec![unnamed, remote("1", "A")]);
        assert_eq!(index.len(), 1);
        assert!(index.contains("A"));
    }

    #[test]
    fn test_missing_records_are_owned_copies() {
        let records = vec![record("A"), record("B")];
        let outcome = partition(&records, &RemoteIndex::default());
        let missing = outcome.missing_records();
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[1].name(), "B");
    }
}
