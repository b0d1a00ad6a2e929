use async_trait::async_trait;
use firestocks_core::{InstrumentRecord, PricePoint, TagCollection};

use crate::error::SourceResult;

/// Port for the local, authoritative instrument snapshot
#[async_trait]
pub trait InstrumentSource: Send + Sync {
    /// All instruments with their computed signals
    async fn instruments(&self) -> SourceResult<Vec<InstrumentRecord>>;
}

/// Port for historical closing prices
pub trait PriceLookup: Send + Sync {
    /// Price history of `symbol`, most recent first
    ///
    /// An empty history means no price is known for the symbol.
    fn price_history(&self, symbol: &str) -> Vec<PricePoint>;

    /// Most recent known price of `symbol`
    fn latest(&self, symbol: &str) -> Option<PricePoint> {
        self.price_history(symbol).into_iter().next()
    }
}

/// Port for the ticker/index reference service
pub trait SymbolReference: Send + Sync {
    /// Every known classification (countries, industries, indices)
    fn tag_collections(&self) -> Vec<TagCollection>;
}
