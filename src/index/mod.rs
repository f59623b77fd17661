pub mod vocabulary;
pub mod matrix;
pub mod tfidf;
pub mod search;
pub mod similarity;

use indexmap::IndexMap;

/// Matrix cell type of a document's page counts
pub type Count = u32;

/// Matrix cell type of a collection: a document total sums many pages
pub type TotalCount = u64;

/// Bag-of-words for one unit: term -> occurrence count.
/// Key order is kept and becomes vocabulary order for unseen terms.
pub type BagOfWords = IndexMap<String, i64>;
