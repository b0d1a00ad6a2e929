//! Firestocks Runner - one sync invocation, end to end
//!
//! - **Config**: environment variables → store, snapshot, shard and batch settings
//! - **Snapshot**: local JSON snapshot as instrument source, price lookup and tag reference
//! - **Shard**: this worker's slice of the instruments
//! - **Strategies**: strategy documents from `DATA_ROOT`
//! - **App**: runs the requested passes through the engine
//!
//! ## Architecture
//!
//! ```text
//!   env ──► RunnerConfig ──► store (Firestore | memory)
//!                                  │
//!   snapshot.json ──► JsonSnapshot │
//!        │                         ▼
//!        └──► select_shard ──► SyncEngine ──► tags.json
//! ```

pub mod app;
pub mod config;
pub mod shard;
pub mod snapshot;
pub mod strategies;

// Re-export main types
pub use app::{App, DEFAULT_TAGS_OUTPUT, RunSummary, RunnerError, Tasks};
pub use config::{ConfigError, RunnerConfig, WorkerShard};
pub use shard::select_shard;
pub use snapshot::JsonSnapshot;
pub use strategies::load_strategies;
