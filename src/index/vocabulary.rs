use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Vocabulary
/// Assigns a stable row index to each unique term in first-seen order.
/// Indices are never reused or reassigned, so the index range is always `[0, len)`.
///
/// Backed by an `IndexSet`: the ordered entry list gives index -> term,
/// the hash table gives term -> index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            terms: IndexSet::new(),
        }
    }

    /// Return the index of `term`, registering it at the end if unseen.
    pub fn get_or_create_index(&mut self, term: &str) -> usize {
        if let Some(idx) = self.terms.get_index_of(term) {
            return idx;
        }
        self.terms.insert_full(Box::from(term)).0
    }

    /// Return the index of `term` without mutating.
    #[inline]
    pub fn lookup(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    #[inline]
    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get_index(idx).map(|t| t.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.as_ref())
    }
}
