//! Loading pre-extracted bag-of-words files.
//!
//! Each `<name>_BoW.json` file holds a JSON array with one object per page,
//! mapping term to count, e.g. `[{"engine": 3, "torque": 1}, {"engine": 1}]`.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::index::BagOfWords;
use crate::library::collection::DocumentCollection;
use crate::library::document::Document;

pub const BAG_FILE_SUFFIX: &str = "_BoW.json";

/// Read the pages of one bag-of-words file
pub fn read_bag_file<P: AsRef<Path>>(path: P) -> Result<Vec<BagOfWords>> {
    let file = File::open(path)?;
    let pages = serde_json::from_reader(BufReader::new(file))?;
    Ok(pages)
}

/// Build a collection from every `*_BoW.json` file in `dir`, in file-name order.
/// Other files and files without pages are skipped.
pub fn load_processed_dir<P: AsRef<Path>>(dir: P) -> Result<DocumentCollection> {
    let dir = dir.as_ref();
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let Some(name) = path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(BAG_FILE_SUFFIX))
        else {
            log::warn!("skipping {}: not a {} file", path.display(), BAG_FILE_SUFFIX);
            continue;
        };
        let pages = read_bag_file(&path)?;
        match Document::from_pages(name, &pages) {
            Ok(doc) => {
                log::debug!("loaded {} ({} pages)", doc.name(), doc.page_count());
                docs.push(doc);
            }
            Err(IndexError::EmptyDocument(_)) => {
                log::warn!("skipping {}: no pages", path.display());
            }
            Err(e) => return Err(e),
        }
    }
    log::info!("loaded {} documents from {}", docs.len(), dir.display());
    DocumentCollection::new(docs)
}
