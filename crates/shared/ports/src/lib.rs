//! Firestocks Ports
//!
//! Port definitions (traits) for the firestocks sync engine.
//! These define the boundaries between the engine and infrastructure:
//! the remote document store on one side, the local snapshot (instruments,
//! prices, reference tags) on the other.

mod clock;
mod error;
mod source;
mod store;

pub use clock::Clock;
pub use error::{SourceError, SourceResult, StoreError, StoreResult};
pub use source::{InstrumentSource, PriceLookup, SymbolReference};
pub use store::{DocumentPage, DocumentStore};
