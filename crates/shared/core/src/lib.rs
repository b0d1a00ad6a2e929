//! Firestocks Core Domain
//!
//! Pure domain types for the firestocks sync engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod documents;
pub mod instruments;
pub mod tags;
pub mod values;

// Re-export commonly used types at crate root
pub use documents::{DocumentHandle, Fields, RemoteDocument, WriteBatch, WriteOp, field};
pub use instruments::{Currency, Instrument, InstrumentRecord, PricePoint, SignalResult};
pub use tags::{TagCollection, TagType};
pub use values::{Price, Symbol, Timestamp, date_stamp};
