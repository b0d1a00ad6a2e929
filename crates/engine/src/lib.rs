//! Firestocks Engine - batched synchronization against a document store
//!
//! Keeps a remote collection eventually consistent with a local snapshot:
//!
//! - **Chunker**: splits work into batches no larger than the store allows
//! - **Collection Purger**: empties a collection page by page before a rewrite
//! - **Batch Writer**: (purge →) chunk → one atomic create-batch per chunk
//! - **Batch Updater**: chunk → one atomic merge-batch per chunk
//! - **Document Matcher**: name index over the remote collection, present vs missing
//! - **Record Projector**: flat document fields from instrument, signals and prices
//!
//! ## Flow of a sync pass
//!
//! ```text
//!   local records ──► Document Matcher ◄── list (paged) ── store
//!                          │
//!              ┌───────────┴───────────┐
//!              │ missing               │ present
//!              ▼                       ▼
//!       Record Projector         Update Planner
//!        (full payload)      (Record Projector, update fields)
//!              │                       │
//!              ▼                       ▼
//!        Batch Writer            Batch Updater
//!              │                       │
//!              └──── chunk ─► BatchSink::write ─► commit ──► store
//! ```
//!
//! Every chunk commits atomically; nothing spans chunks.

pub mod cancel;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod listing;
pub mod matcher;
pub mod projector;
pub mod purge;
pub mod reconcile;
pub mod sink;
pub mod updater;
pub mod writer;

// Re-export main types
pub use cancel::Cancellation;
pub use chunk::chunk;
pub use config::SyncConfig;
pub use engine::{PassReport, SyncEngine};
pub use error::{Phase, SyncError, SyncResult};
pub use export::{StockSummary, TagExport};
pub use listing::list_all;
pub use matcher::{DocumentMatcher, MatchOutcome, RemoteIndex, partition};
pub use projector::{Diagnostic, LastPrices, Projection, RecordProjector, dedup_signals};
pub use purge::CollectionPurger;
pub use reconcile::{UpdatePlan, UpdatePlanner};
pub use sink::{BatchSink, CreateSink, MergeSink, drain};
pub use updater::{BatchUpdater, UpdateSummary};
pub use writer::{BatchWriter, WriteSummary};
