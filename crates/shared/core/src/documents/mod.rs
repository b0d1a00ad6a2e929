//! Remote document shapes
//!
//! Documents are flat field mappings. The engine only ever sees a remote
//! document through a `DocumentHandle` plus the fields it had when listed.

mod batch;
pub mod field;
mod handle;

pub use batch::{WriteBatch, WriteOp};
pub use handle::{DocumentHandle, RemoteDocument};

/// Flat field mapping persisted to the store
pub type Fields = serde_json::Map<String, serde_json::Value>;
