//! Tag file export - instrument summaries plus every tag type

use std::collections::{BTreeMap, BTreeSet};

use firestocks_core::{RemoteDocument, TagType, field};
use log::warn;
use serde::Serialize;

use crate::error::{Phase, SyncError, SyncResult};

/// Instrument attributes carried into the tag file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSummary {
    pub name: String,
    pub symbols_eur: Vec<String>,
    pub symbols_usd: Vec<String>,
    pub tags: Vec<String>,
    pub indices: Vec<String>,
    pub country: Option<String>,
}

impl StockSummary {
    fn from_document(doc: &RemoteDocument) -> Option<Self> {
        let name = doc.name()?.to_string();
        Some(Self {
            name,
            symbols_eur: doc.strings(field::SYMBOLS_EUR),
            symbols_usd: doc.strings(field::SYMBOLS_USD),
            tags: doc.strings(field::TAGS),
            indices: doc.strings(field::INDICES),
            country: doc
                .fields
                .get(field::COUNTRY)
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}

/// Contents of the tag file
///
/// Serializes as `{"stocks": [...], "<tag type>": [unique tags], ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagExport {
    pub stocks: Vec<StockSummary>,
    #[serde(flatten)]
    pub tags: BTreeMap<String, BTreeSet<String>>,
}

impl TagExport {
    /// Build the export from listed `stocks` and `tags` documents
    pub fn from_documents(stock_docs: &[RemoteDocument], tag_docs: &[RemoteDocument]) -> Self {
        let stocks = stock_docs
            .iter()
            .filter_map(|doc| {
                let summary = StockSummary::from_document(doc);
                if summary.is_none() {
                    warn!("Stock document {} has no name, leaving it out", doc.handle);
                }
                summary
            })
            .collect();

        let mut tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for doc in tag_docs {
            let Some(tag_type) = doc.fields.get(field::TYPE).and_then(|v| v.as_str()) else {
                warn!("Tag document {} has no type, leaving it out", doc.handle);
                continue;
            };
            if tag_type == "stocks" {
                warn!("Tag document {} would shadow the stocks list", doc.handle);
                continue;
            }
            if TagType::parse(tag_type).is_none() {
                warn!("Tag document {} has unknown type '{}'", doc.handle, tag_type);
            }
            tags.entry(tag_type.to_string())
                .or_default()
                .extend(doc.strings(field::TAGS));
        }

        Self { stocks, tags }
    }

    pub fn to_json(&self) -> SyncResult<String> {
        serde_json::to_string(self).map_err(SyncError::encode(Phase::Export))
    }
}
