//! Local, authoritative instrument records
//!
//! - `Instrument`: a traded entity keyed by its unique `name`
//! - `SignalResult`: one computed filter outcome for one instrument
//! - `PricePoint`: one closing price of one ticker symbol

mod instrument;
mod price;
mod signal;

pub use instrument::{Currency, Instrument, InstrumentRecord};
pub use price::PricePoint;
pub use signal::SignalResult;
