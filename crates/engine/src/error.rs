//! Error types for the sync engine

use firestocks_ports::{SourceError, StoreError};
use thiserror::Error;

/// Step of a sync pass, reported with every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Purge,
    Write,
    Update,
    Match,
    List,
    Export,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Purge => "purge",
            Phase::Write => "write",
            Phase::Update => "update",
            Phase::Match => "match",
            Phase::List => "list",
            Phase::Export => "export",
        };
        f.write_str(name)
    }
}

/// Sync engine errors
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("{phase} failed: {source}")]
    Store {
        phase: Phase,
        #[source]
        source: StoreError,
    },

    #[error("update failed: no local instrument for remote document '{key}'")]
    Reconciliation { key: String },

    #[error("update failed: stock {name} doesn't exist in the remote store")]
    UnknownRemoteRecord { name: String },

    #[error("{phase} failed: cannot encode: {source}")]
    Encode {
        phase: Phase,
        #[source]
        source: serde_json::Error,
    },

    #[error("{phase} cancelled")]
    Cancelled { phase: Phase },

    #[error("load failed: {0}")]
    Source(#[from] SourceError),
}

impl SyncError {
    /// Wrap a store failure with the phase it happened in
    pub fn store(phase: Phase) -> impl FnOnce(StoreError) -> SyncError {
        move |source| SyncError::Store { phase, source }
    }

    /// Wrap a serialization failure with the phase it happened in
    pub fn encode(phase: Phase) -> impl FnOnce(serde_json::Error) -> SyncError {
        move |source| SyncError::Encode { phase, source }
    }

    /// Phase the error belongs to, when it belongs to one
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SyncError::Store { phase, .. }
            | SyncError::Encode { phase, .. }
            | SyncError::Cancelled { phase } => Some(*phase),
            SyncError::Reconciliation { .. } | SyncError::UnknownRemoteRecord { .. } => {
                Some(Phase::Update)
            }
            SyncError::Precondition(_) | SyncError::Source(_) => None,
        }
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
