//! Firestore adapter
//!
//! Implements the `DocumentStore` port over the Firestore REST API:
//!
//! - `list_page` → `GET .../documents/{collection}?pageSize=&pageToken=`
//! - `delete_document` → `DELETE .../documents/{collection}/{id}`
//! - `commit` → `POST .../documents:commit`, one atomic request per batch
//!
//! Documents travel as typed Firestore values; `value` converts them to and
//! from the flat JSON fields the engine works with.

pub mod client;
pub mod config;
pub mod error;
pub mod value;
mod wire;

pub use client::{FirestoreClient, MAX_BATCH_SIZE, connect};
pub use config::FirestoreConfig;
pub use error::RestError;
