use rayon::prelude::*;

use crate::error::{IndexError, Result};
use crate::index::matrix::{validate_counts, FrequencyMatrix};
use crate::index::search::{score_query, Hits};
use crate::index::similarity::{cosine_similarity, l1_normalize};
use crate::index::tfidf::{CollectionTFIDFEngine, TFIDFEngine, TFIDFMatrix};
use crate::index::vocabulary::Vocabulary;
use crate::index::TotalCount;
use crate::library::document::Document;

/// DocumentCollection
/// Ordered list of documents plus a collection-wide matrix whose columns are
/// each document's total term counts.
/// A document's position is its id; documents are only ever appended.
#[derive(Debug, Clone)]
pub struct DocumentCollection {
    docs: Vec<Document>,
    vocab: Vocabulary,
    matrix: FrequencyMatrix<TotalCount>,
    tfidf: TFIDFMatrix,
}

/// One ranked document for a query
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatch {
    pub doc_id: usize,
    pub name: String,
    pub score: f64,
    /// score relative to the best document (1.0 for the best one)
    pub relative: f64,
    /// best page inside the document, 0-based
    pub best_page: usize,
}

impl DocumentCollection {
    /// Build a collection; at least one document is required.
    /// TF-IDF is computed once after all documents are in.
    pub fn new(docs: Vec<Document>) -> Result<Self> {
        if docs.is_empty() {
            return Err(IndexError::EmptyCollection);
        }
        let mut collection = Self {
            docs: Vec::with_capacity(docs.len()),
            vocab: Vocabulary::new(),
            matrix: FrequencyMatrix::new(),
            tfidf: TFIDFMatrix::default(),
        };
        for doc in docs {
            collection.append(doc)?;
        }
        collection.recompute();
        Ok(collection)
    }

    /// Rebuild from persisted raw counts; derived state is recomputed.
    pub(crate) fn from_parts(docs: Vec<Document>, vocab: Vocabulary, matrix: FrequencyMatrix<TotalCount>) -> Result<Self> {
        if docs.is_empty() {
            return Err(IndexError::EmptyCollection);
        }
        matrix.check_shape(vocab.len(), docs.len())?;
        let mut collection = Self {
            docs,
            vocab,
            matrix,
            tfidf: TFIDFMatrix::default(),
        };
        collection.recompute();
        Ok(collection)
    }

    /// Append a document and recompute TF-IDF.
    /// On error the collection is unchanged.
    pub fn add_doc(&mut self, doc: Document) -> Result<()> {
        self.append(doc)?;
        self.recompute();
        Ok(())
    }

    fn append(&mut self, doc: Document) -> Result<()> {
        {
            let counts = validate_counts::<TotalCount, u64>(doc.total_frequency_pairs())?;
            self.matrix.grow(&mut self.vocab, &counts)?;
        }
        self.docs.push(doc);
        Ok(())
    }

    fn recompute(&mut self) {
        self.tfidf = CollectionTFIDFEngine::weigh(&self.matrix);
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    #[inline]
    pub fn document(&self, id: usize) -> Option<&Document> {
        self.docs.get(id)
    }

    /// Id of the first document called `name`
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.docs.iter().position(|d| d.name() == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    #[inline]
    pub fn matrix(&self) -> &FrequencyMatrix<TotalCount> {
        &self.matrix
    }

    #[inline]
    pub fn tfidf(&self) -> &TFIDFMatrix {
        &self.tfidf
    }

    /// Score every document against `terms`.
    /// Sorted descending: the best document is the first entry.
    pub fn search<T>(&self, terms: &[T]) -> Hits
    where
        T: AsRef<str>,
    {
        log::info!(
            "search conducted: {:?}",
            terms.iter().map(AsRef::as_ref).collect::<Vec<&str>>()
        );
        let mut hits = score_query(terms, &self.tfidf, &self.vocab);
        hits.sort_by_score();
        hits
    }

    /// Up to `n` best documents, each with its best page.
    /// Empty when the top score is 0 (no query term matched).
    pub fn best_matches<T>(&self, terms: &[T], n: usize) -> Vec<DocumentMatch>
    where
        T: AsRef<str>,
    {
        let hits = self.search(terms);
        let top = match hits.first() {
            Some((_, score)) if score > 0.0 => score,
            _ => return Vec::new(),
        };
        hits.list
            .iter()
            .take(n)
            .filter(|(_, score)| *score > 0.0)
            .map(|&(doc_id, score)| {
                let doc = &self.docs[doc_id];
                DocumentMatch {
                    doc_id,
                    name: doc.name().to_string(),
                    score,
                    relative: score / top,
                    best_page: doc.best_page(terms),
                }
            })
            .collect()
    }

    fn raw_column(&self, id: usize) -> Result<Vec<f64>> {
        self.matrix
            .column(id)
            .ok_or(IndexError::DocumentOutOfRange { id, len: self.docs.len() })
    }

    /// Raw term counts of a document over the collection vocabulary, L1-normalized
    pub fn document_vector(&self, id: usize) -> Result<Vec<f64>> {
        Ok(l1_normalize(&self.raw_column(id)?))
    }

    /// Cosine similarity of two documents' raw count vectors.
    /// A document without any counted term has similarity 0 to everything.
    pub fn cosine_similarity(&self, a: usize, b: usize) -> Result<f64> {
        Ok(cosine_similarity(&self.raw_column(a)?, &self.raw_column(b)?))
    }

    /// Every other document ranked by cosine similarity, most similar first
    pub fn similar_documents(&self, id: usize) -> Result<Hits> {
        let target = self.raw_column(id)?;
        let mut list: Vec<(usize, f64)> = (0..self.docs.len())
            .into_par_iter()
            .map(|k| {
                let other = self.matrix.column(k).unwrap_or_default();
                (k, cosine_similarity(&target, &other))
            })
            .collect();
        list.remove(id);
        let mut hits = Hits::new(list);
        hits.sort_by_score();
        Ok(hits)
    }
}
