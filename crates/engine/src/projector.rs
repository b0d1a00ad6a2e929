//! Record Projector - local records to flat document fields
//!
//! Nested signal results become top-level `<filter>_value` and
//! `<filter>_status` fields so the store can filter on them directly.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use firestocks_core::{
    Currency, Fields, Instrument, InstrumentRecord, Price, SignalResult, Symbol, date_stamp,
    field,
};
use firestocks_ports::{Clock, PriceLookup};
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Latest close per symbol; `None` where no price is known
pub type LastPrices = BTreeMap<Symbol, Option<Price>>;

/// Non-fatal finding while projecting a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No price history for a symbol; its entry is written as null
    MissingPrice {
        instrument: String,
        symbol: Symbol,
        currency: Currency,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingPrice {
                instrument,
                symbol,
                currency,
            } => write!(f, "Prices are not correct for {symbol} ({instrument}, {currency})"),
        }
    }
}

/// Fields produced for one record plus what went wrong on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub fields: Fields,
    pub diagnostics: Vec<Diagnostic>,
}

/// Keep the first signal of every filter name, in input order
pub fn dedup_signals(signals: &[SignalResult]) -> Vec<&SignalResult> {
    let mut seen = HashSet::new();
    signals
        .iter()
        .filter(|signal| seen.insert(signal.filter_name.as_str()))
        .collect()
}

/// Resolve the latest close of every `currency` symbol of `instrument`
///
/// Missing prices become `None` and are reported in `diagnostics`.
pub fn resolve_prices(
    instrument: &Instrument,
    currency: Currency,
    prices: &dyn PriceLookup,
    diagnostics: &mut Vec<Diagnostic>,
) -> LastPrices {
    let mut last = LastPrices::new();
    for symbol in instrument.symbols(currency) {
        let close = prices.latest(symbol).map(|point| point.close);
        if close.is_none() {
            let diagnostic = Diagnostic::MissingPrice {
                instrument: instrument.name.clone(),
                symbol: symbol.clone(),
                currency,
            };
            log::warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }
        last.insert(symbol.clone(), close);
    }
    last
}

/// Builds document payloads stamped with the pass date
pub struct RecordProjector {
    clock: Arc<dyn Clock>,
}

impl RecordProjector {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Pass date in `MM/DD/YYYY`
    pub fn date_stamp(&self) -> String {
        date_stamp(&self.clock.now())
    }

    /// Complete document for a (re)write: instrument attributes, prices and
    /// flattened signals. `position` is the record's index within the pass.
    pub fn full_payload(
        &self,
        position: usize,
        record: &InstrumentRecord,
        prices: &dyn PriceLookup,
    ) -> Projection {
        let instrument = &record.instrument;
        let mut fields = Fields::new();
        fields.insert(field::ID.to_string(), position.into());
        fields.insert(field::NAME.to_string(), instrument.name.clone().into());
        fields.insert(field::SYMBOLS_USD.to_string(), instrument.symbols_usd.clone().into());
        fields.insert(field::SYMBOLS_EUR.to_string(), instrument.symbols_eur.clone().into());
        fields.insert(field::COUNTRY.to_string(), instrument.country.clone().into());
        fields.insert(field::TAGS.to_string(), string_array(&instrument.tags));
        fields.insert(field::INDICES.to_string(), string_array(&instrument.indices));

        let mut projection = self.update_fields(record, prices);
        projection.fields.extend(fields);
        projection
    }

    /// Fields merged into an existing document: date, prices and signals
    pub fn update_fields(&self, record: &InstrumentRecord, prices: &dyn PriceLookup) -> Projection {
        let instrument = &record.instrument;
        let mut diagnostics = Vec::new();
        let mut fields = Fields::new();

        fields.insert(field::DATE.to_string(), self.date_stamp().into());
        for currency in Currency::ALL {
            let last = resolve_prices(instrument, currency, prices, &mut diagnostics);
            fields.insert(currency.last_price_field().to_string(), prices_value(&last));
        }

        for signal in dedup_signals(&record.signals) {
            fields.insert(signal.value_field(), signal.value.into());
            fields.insert(signal.status_field(), signal.status.clone().into());
        }

        Projection {
            fields,
            diagnostics,
        }
    }
}

fn string_array<'s>(values: impl IntoIterator<Item = &'s String>) -> Value {
    Value::Array(values.into_iter().cloned().map(Value::String).collect())
}

fn prices_value(last: &LastPrices) -> Value {
    let map = last
        .iter()
        .map(|(symbol, close)| {
            let value = close
                .and_then(|close| close.to_f64())
                .map(Value::from)
                .unwrap_or(Value::Null);
            (symbol.clone(), value)
        })
        .collect();
    Value::Object(map)
}
