/// This crate indexes paginated documents and answers TF-IDF search and
/// similarity queries over them.
pub mod error;
pub mod index;
pub mod library;
pub mod ingest;
pub mod session;
pub mod config;

/// Crate error type and result alias
pub use error::{IndexError, Result};

/// Vocabulary
/// Stable term -> row index mapping, in first-seen order.
pub use index::vocabulary::Vocabulary;

/// Frequency Matrix
/// Growable term x unit table of raw counts.
/// Growth validates every count first, so a rejected unit never leaves the
/// matrix and its vocabulary out of step.
pub use index::matrix::FrequencyMatrix;

/// Bag-of-words input for one page or document: term -> count
pub use index::BagOfWords;

/// TF IDF Calculation Engine Trait
/// Two engines are provided:
/// - `PageTFIDFEngine`: pages of one document, `count * ln(P / df)`
/// - `CollectionTFIDFEngine`: documents of a collection, `(count / doc_len) * ln(D / df)`
pub use index::tfidf::{CollectionTFIDFEngine, PageTFIDFEngine, TFIDFEngine, TFIDFMatrix};

/// Search results
/// `Hits` holds `(unit index, score)` pairs and the query terms that were not found.
pub use index::search::Hits;

/// Document
/// A paginated document with its own vocabulary, page matrix and page-level TF-IDF.
/// `search` sorts pages ascending (best page last).
pub use library::document::Document;

/// Document Collection
/// Ordered documents plus a collection-level matrix of document totals.
/// `search` sorts documents descending (best document first).
/// Also provides cosine similarity ranking and snapshot persistence.
pub use library::collection::{DocumentCollection, DocumentMatch};

/// Snapshot deserialization helpers
pub use library::snapshot::{CollectionData, DocumentData, SNAPSHOT_VERSION};

/// Query normalization seam and the session container
pub use session::{SearchSession, TermNormalizer, WhitespaceNormalizer};
