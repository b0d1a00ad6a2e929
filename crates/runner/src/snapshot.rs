//! JSON snapshot - the local, authoritative data for one pass
//!
//! ```json
//! {
//!   "instruments": [{"name": "adidas AG", "country": "Germany",
//!                    "symbols_eur": ["ADS.F"], "signals": [...]}],
//!   "prices": {"ADS.F": [{"date": "2024-05-03", "close": "150.0"}]},
//!   "tags": [{"type": "countries", "tags": ["Germany"]}]
//! }
//! ```
//!
//! When `tags` is absent the tag collections are derived from the
//! instruments themselves.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use firestocks_core::{InstrumentRecord, PricePoint, Symbol, TagCollection, TagType};
use firestocks_ports::{
    InstrumentSource, PriceLookup, SourceError, SourceResult, SymbolReference,
};
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    instruments: Vec<InstrumentRecord>,
    #[serde(default)]
    prices: HashMap<Symbol, Vec<PricePoint>>,
    tags: Option<Vec<TagCollection>>,
}

#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    instruments: Vec<InstrumentRecord>,
    /// Newest first
    prices: HashMap<Symbol, Vec<PricePoint>>,
    tags: Vec<TagCollection>,
}

impl JsonSnapshot {
    pub fn load(path: &Path) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        info!(
            "Loaded {} instruments and {} price series from {}",
            snapshot.instruments.len(),
            snapshot.prices.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn from_json(json: &str) -> SourceResult<Self> {
        let file: SnapshotFile =
            serde_json::from_str(json).map_err(|e| SourceError::Malformed(e.to_string()))?;

        let mut seen = HashSet::new();
        for record in &file.instruments {
            if !seen.insert(record.name()) {
                return Err(SourceError::DuplicateName(record.name().to_string()));
            }
        }

        let mut prices = file.prices;
        for history in prices.values_mut() {
            history.sort_by(|a, b| b.date.cmp(&a.date));
        }

        let tags = match file.tags {
            Some(tags) => tags,
            None => derive_tags(&file.instruments),
        };

        Ok(Self {
            instruments: file.instruments,
            prices,
            tags,
        })
    }

    pub fn records(&self) -> &[InstrumentRecord] {
        &self.instruments
    }
}

fn derive_tags(instruments: &[InstrumentRecord]) -> Vec<TagCollection> {
    let mut countries = BTreeSet::new();
    let mut industries = BTreeSet::new();
    let mut indices = BTreeSet::new();
    for record in instruments {
        let instrument = &record.instrument;
        countries.insert(instrument.country.clone());
        industries.extend(instrument.tags.iter().cloned());
        indices.extend(instrument.indices.iter().cloned());
    }
    vec![
        TagCollection::new(TagType::Countries, countries),
        TagCollection::new(TagType::Industries, industries),
        TagCollection::new(TagType::Indices, indices),
    ]
}

#[async_trait]
impl InstrumentSource for JsonSnapshot {
    async fn instruments(&self) -> SourceResult<Vec<InstrumentRecord>> {
        Ok(self.instruments.clone())
    }
}

impl PriceLookup for JsonSnapshot {
    fn price_history(&self, symbol: &str) -> Vec<PricePoint> {
        self.prices.get(symbol).cloned().unwrap_or_default()
    }
}

impl SymbolReference for JsonSnapshot {
    fn tag_collections(&self) -> Vec<TagCollection> {
        self.tags.clone()
    }
}
