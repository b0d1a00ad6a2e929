use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::SignalResult;
use crate::documents::field;
use crate::values::Symbol;

/// Quote currency of a ticker symbol list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
}

impl Currency {
    /// Both currencies, in the order prices are resolved
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Eur];

    /// Document field holding the symbol list for this currency
    pub fn symbols_field(&self) -> &'static str {
        match self {
            Currency::Usd => field::SYMBOLS_USD,
            Currency::Eur => field::SYMBOLS_EUR,
        }
    }

    /// Document field holding the symbol → last close map for this currency
    pub fn last_price_field(&self) -> &'static str {
        match self {
            Currency::Usd => field::LAST_PRICE_USD,
            Currency::Eur => field::LAST_PRICE_EUR,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Eur => write!(f, "EUR"),
        }
    }
}

/// A traded entity
///
/// `name` is the natural key: it is unique within one sync pass and is the
/// only field used to join local instruments with remote documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    /// Ticker symbols used to look up USD prices, in lookup order
    #[serde(default)]
    pub symbols_usd: Vec<Symbol>,
    /// Ticker symbols used to look up EUR prices, in lookup order
    #[serde(default)]
    pub symbols_eur: Vec<Symbol>,
    /// Single region classification
    pub country: String,
    /// Industry / classification labels
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Index memberships
    #[serde(default)]
    pub indices: BTreeSet<String>,
}

impl Instrument {
    /// Create an instrument with no symbols, tags or indices
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols_usd: Vec::new(),
            symbols_eur: Vec::new(),
            country: country.into(),
            tags: BTreeSet::new(),
            indices: BTreeSet::new(),
        }
    }

    pub fn with_usd_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols_usd = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_eur_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols_eur = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices = indices.into_iter().map(Into::into).collect();
        self
    }

    /// Symbols quoted in the given currency
    pub fn symbols(&self, currency: Currency) -> &[Symbol] {
        match currency {
            Currency::Usd => &self.symbols_usd,
            Currency::Eur => &self.symbols_eur,
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An instrument together with the signals computed for it upstream
///
/// Signals keep the order in which the filters were evaluated; that order
/// decides which duplicate survives flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    #[serde(flatten)]
    pub instrument: Instrument,
    #[serde(default)]
    pub signals: Vec<SignalResult>,
}

impl InstrumentRecord {
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            signals: Vec::new(),
        }
    }

    pub fn with_signal(mut self, signal: SignalResult) -> Self {
        self.signals.push(signal);
        self
    }

    /// Natural key of the underlying instrument
    pub fn name(&self) -> &str {
        &self.instrument.name
    }
}

impl From<Instrument> for InstrumentRecord {
    fn from(instrument: Instrument) -> Self {
        Self::new(instrument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_by_currency() {
        let instrument = Instrument::new("adidas AG", "Germany")
            .with_eur_symbols(["ADS.F", "ADS.DE"])
            .with_usd_symbols(["ADDYY"]);

        assert_eq!(instrument.symbols(Currency::Eur), ["ADS.F", "ADS.DE"]);
        assert_eq!(instrument.symbols(Currency::Usd), ["ADDYY"]);
    }

    #[test]
    fn test_currency_fields() {
        assert_eq!(Currency::Usd.symbols_field(), "symbols_usd");
        assert_eq!(Currency::Eur.last_price_field(), "last_price_eur");
    }

    #[test]
    fn test_record_deserializes_flattened() {
        let json = r#"{
            "name": "adidas AG",
            "symbols_eur": ["ADS.F"],
            "country": "Germany",
            "tags": ["Apparel"],
            "indices": ["DAX"],
            "signals": [{"filter_name": "DividendKings", "value": 4.1, "status": "buy"}]
        }"#;

        let record: InstrumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name(), "adidas AG");
        assert!(record.instrument.symbols_usd.is_empty());
        assert_eq!(record.signals.len(), 1);
        assert_eq!(record.signals[0].status, "buy");
    }
}
