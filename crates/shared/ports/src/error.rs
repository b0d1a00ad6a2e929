use thiserror::Error;

/// Failures reported by a remote document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Store rejected request: {code} - {message}")]
    Rejected { code: u16, message: String },

    #[error("Batch of {ops} writes exceeds store limit of {max}")]
    BatchTooLarge { ops: usize, max: usize },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures loading the local authoritative snapshot
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(String),

    #[error("Duplicate instrument name: {0}")]
    DuplicateName(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;
