use std::fmt::{self, Debug};

use crate::index::tfidf::TFIDFMatrix;
use crate::index::vocabulary::Vocabulary;

/// Structure to store search results
pub struct Hits {
    /// (unit index, score)
    pub list: Vec<(usize, f64)>,
    /// Query terms absent from the vocabulary, in query order
    pub unknown_terms: Vec<String>,
}

impl Hits {
    /// Create a new Hits instance
    pub fn new(list: Vec<(usize, f64)>) -> Self {
        Hits {
            list,
            unknown_terms: Vec::new(),
        }
    }

    /// Sort results by descending score
    /// Equal scores keep their unit order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    /// Sort results by ascending score
    /// Equal scores keep their unit order.
    pub fn sort_by_score_rev(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| a.1.total_cmp(&b.1));
        self
    }

    pub fn first(&self) -> Option<(usize, f64)> {
        self.list.first().copied()
    }

    pub fn last(&self) -> Option<(usize, f64)> {
        self.list.last().copied()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// True when no unit scored above zero (no recognised query term, or empty query)
    pub fn is_no_match(&self) -> bool {
        self.list.iter().all(|(_, s)| *s == 0.0)
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (unit, score) in &self.list {
                writeln!(f, "    {}: {:.6}", unit, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Additive TF-IDF scoring.
/// Every recognised query term adds its whole weight row to the score vector;
/// repeated terms count once per occurrence. Unknown terms add nothing and are
/// recorded on the returned `Hits`.
///
/// The result has one entry per unit, in unit order (unsorted).
pub fn score_query<T>(query: &[T], tfidf: &TFIDFMatrix, vocab: &Vocabulary) -> Hits
where
    T: AsRef<str>,
{
    let mut scores = vec![0.0_f64; tfidf.unit_count()];
    let mut unknown_terms = Vec::new();
    for term in query {
        let term = term.as_ref();
        match vocab.lookup(term).and_then(|idx| tfidf.row(idx)) {
            Some(row) => {
                for (score, w) in scores.iter_mut().zip(row) {
                    *score += w;
                }
            }
            None => {
                log::debug!("term not found: {}", term);
                unknown_terms.push(term.to_string());
            }
        }
    }
    Hits {
        list: scores.into_iter().enumerate().collect(),
        unknown_terms,
    }
}
