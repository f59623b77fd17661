use std::path::Path;

use crate::error::Result;
use crate::ingest::load_processed_dir;
use crate::library::collection::{DocumentCollection, DocumentMatch};

/// Turns free text into query terms.
/// Implementations are stateless service handles; lemmatization and stop-word
/// handling belong here, never in the index.
pub trait TermNormalizer {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// Lowercases, splits on whitespace, trims punctuation and drops tokens
/// shorter than 3 characters. No lemmatization.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceNormalizer;

impl TermNormalizer for WhitespaceNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|tok| tok.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|tok| tok.chars().count() > 2)
            .collect()
    }
}

/// Holds the injected normalizer and the current library
pub struct SearchSession<T> {
    normalizer: T,
    library: Option<DocumentCollection>,
}

impl<T> SearchSession<T>
where
    T: TermNormalizer,
{
    pub fn new(normalizer: T) -> Self {
        Self {
            normalizer,
            library: None,
        }
    }

    pub fn library(&self) -> Option<&DocumentCollection> {
        self.library.as_ref()
    }

    pub fn set_library(&mut self, library: DocumentCollection) {
        self.library = Some(library);
    }

    /// Replace the library with a snapshot.
    /// Returns false (library unchanged) when the snapshot is missing or unusable;
    /// the caller is expected to rebuild from source documents.
    pub fn load_library<P: AsRef<Path>>(&mut self, path: P) -> bool {
        match DocumentCollection::load_snapshot(path) {
            Ok(library) => {
                self.library = Some(library);
                true
            }
            Err(e) => {
                log::warn!("library snapshot unusable: {}", e);
                false
            }
        }
    }

    /// Save the current library. Returns false when there is nothing to save.
    pub fn save_library<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        match &self.library {
            Some(library) => {
                library.save_snapshot(path)?;
                Ok(true)
            }
            None => {
                log::warn!("no library to save");
                Ok(false)
            }
        }
    }

    /// Rebuild the library from a directory of bag-of-words files
    pub fn rebuild_library<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        self.library = Some(load_processed_dir(dir)?);
        Ok(())
    }

    pub fn process_input(&self, text: &str) -> Vec<String> {
        let terms = self.normalizer.normalize(text);
        log::debug!("query {:?} -> {:?}", text, terms);
        terms
    }

    /// Normalize `text` and return up to `n` matching documents.
    /// Empty without a library or when nothing matched.
    pub fn lookup(&self, text: &str, n: usize) -> Vec<DocumentMatch> {
        let Some(library) = &self.library else {
            return Vec::new();
        };
        let terms = self.process_input(text);
        library.best_matches(terms.as_slice(), n)
    }
}
