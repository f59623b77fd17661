use std::fmt;

use indexmap::IndexMap;

use crate::error::{IndexError, Result};
use crate::index::matrix::{validate_counts, FrequencyMatrix};
use crate::index::search::{score_query, Hits};
use crate::index::tfidf::{PageTFIDFEngine, TFIDFEngine, TFIDFMatrix};
use crate::index::vocabulary::Vocabulary;
use crate::index::{BagOfWords, Count};

/// Document
/// One paginated source document.
/// Rows of its matrix are the document's own vocabulary, columns are pages in
/// the order they were added. Pages are only ever appended.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    vocab: Vocabulary,
    pages: FrequencyMatrix<Count>,
    /// Row sums of `pages`, kept in step after every page
    totals: Vec<u64>,
    tfidf: TFIDFMatrix,
}

impl Document {
    /// Create a document from its first page
    pub fn new(name: impl Into<String>, first_page: &BagOfWords) -> Result<Self> {
        let mut doc = Self {
            name: name.into(),
            vocab: Vocabulary::new(),
            pages: FrequencyMatrix::new(),
            totals: Vec::new(),
            tfidf: TFIDFMatrix::default(),
        };
        doc.add_page(first_page)?;
        Ok(doc)
    }

    /// Create a document from an ordered sequence of pages
    pub fn from_pages<'a, I>(name: impl Into<String>, pages: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a BagOfWords>,
    {
        let name = name.into();
        let mut pages = pages.into_iter();
        let first = pages.next().ok_or_else(|| IndexError::EmptyDocument(name.clone()))?;
        let mut doc = Self::new(name, first)?;
        for page in pages {
            doc.add_page(page)?;
        }
        Ok(doc)
    }

    /// Rebuild from persisted raw counts; derived state is recomputed.
    pub(crate) fn from_parts(name: String, vocab: Vocabulary, pages: FrequencyMatrix<Count>) -> Result<Self> {
        if pages.unit_count() == 0 {
            return Err(IndexError::EmptyDocument(name));
        }
        pages.check_shape(vocab.len(), pages.unit_count())?;
        let totals = pages.row_sums();
        let tfidf = PageTFIDFEngine::weigh(&pages);
        Ok(Self { name, vocab, pages, totals, tfidf })
    }

    /// Append a page.
    /// Counts are validated before anything changes; a rejected page leaves
    /// the document as it was.
    pub fn add_page(&mut self, page: &BagOfWords) -> Result<()> {
        let counts = validate_counts::<Count, i64>(page.iter().map(|(t, &c)| (t.as_str(), c)))?;
        self.pages.grow(&mut self.vocab, &counts)?;
        self.totals = self.pages.row_sums();
        self.tfidf = PageTFIDFEngine::weigh(&self.pages);
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.unit_count()
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    #[inline]
    pub fn pages(&self) -> &FrequencyMatrix<Count> {
        &self.pages
    }

    #[inline]
    pub fn tfidf(&self) -> &TFIDFMatrix {
        &self.tfidf
    }

    /// (term, total count over all pages) in vocabulary order
    pub fn total_frequency_pairs(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.vocab.iter().zip(self.totals.iter().copied())
    }

    /// term -> total count over all pages, in vocabulary order
    pub fn total_frequencies(&self) -> IndexMap<&str, u64> {
        self.total_frequency_pairs().collect()
    }

    /// Score every page against `terms`.
    /// Sorted ascending: the best page is the last entry.
    pub fn search<T>(&self, terms: &[T]) -> Hits
    where
        T: AsRef<str>,
    {
        log::info!(
            "search conducted within document {}: {:?}",
            self.name,
            terms.iter().map(AsRef::as_ref).collect::<Vec<&str>>()
        );
        let mut hits = score_query(terms, &self.tfidf, &self.vocab);
        hits.sort_by_score_rev();
        hits
    }

    /// Index of the best scoring page (the last entry of `search`)
    pub fn best_page<T>(&self, terms: &[T]) -> usize
    where
        T: AsRef<str>,
    {
        self.search(terms).last().map_or(0, |(page, _)| page)
    }

    /// Every term repeated by its total count, space-joined, in vocabulary order.
    /// Input for word-cloud renderers.
    pub fn term_frequency_string(&self) -> String {
        let mut words: Vec<&str> = Vec::new();
        for (term, total) in self.total_frequency_pairs() {
            words.extend(std::iter::repeat(term).take(total as usize));
        }
        words.join(" ")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
