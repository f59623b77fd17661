//! Error type shared by the index, the library and snapshot persistence.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    /// A bag-of-words carried a count below zero
    #[error("negative count for term {term:?}")]
    NegativeCount { term: String },

    /// A count does not fit the matrix cell type
    #[error("count for term {term:?} does not fit the matrix cell type")]
    CountOverflow { term: String },

    /// A document was built without any page
    #[error("document {0:?} has no pages")]
    EmptyDocument(String),

    #[error("a document collection needs at least one document")]
    EmptyCollection,

    #[error("document id {id} out of range (collection has {len} documents)")]
    DocumentOutOfRange { id: usize, len: usize },

    /// Matrix dimensions disagree with the vocabulary or the unit count
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("snapshot format version {found} is not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("snapshot is corrupt: {0}")]
    SnapshotCorrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bag-of-words parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding error: {0}")]
    Cbor(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
