//! In-memory document store
//!
//! A single-process `DocumentStore` with the behaviour the engine relies on:
//! ordered paginated listing, atomic batches bounded by a maximum operation
//! count, and top-level field merges. Commits and deletes can be made to
//! fail on the n-th call to exercise partial-failure paths.

mod store;

pub use store::{DEFAULT_MAX_BATCH_SIZE, MemoryStore};
