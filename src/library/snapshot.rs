//! Versioned snapshot of a document collection.
//!
//! Layout: 8-byte magic `TFIDFLIB`, u32 little-endian format version, CBOR body.
//! The body holds raw counts only (vocabularies, frequency matrices, document
//! names); TF-IDF is recomputed on load.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{ser::SerializeStruct, Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{IndexError, Result};
use crate::index::matrix::FrequencyMatrix;
use crate::index::vocabulary::Vocabulary;
use crate::index::{Count, TotalCount};
use crate::library::collection::DocumentCollection;
use crate::library::document::Document;

pub const SNAPSHOT_MAGIC: &[u8; 8] = b"TFIDFLIB";
pub const SNAPSHOT_VERSION: u32 = 1;

impl Serialize for Document {
    /// Raw counts only; derived totals and TF-IDF are left out.
    /// Use `DocumentData` to deserialize.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Document", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("vocab", self.vocabulary())?;
        state.serialize_field("pages", self.pages())?;
        state.end()
    }
}

impl Serialize for DocumentCollection {
    /// Raw counts only. Use `CollectionData` to deserialize.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DocumentCollection", 3)?;
        state.serialize_field("vocab", self.vocabulary())?;
        state.serialize_field("matrix", self.matrix())?;
        state.serialize_field("documents", self.documents())?;
        state.end()
    }
}

/// Deserialized form of a `Document`
#[derive(Debug, Deserialize)]
pub struct DocumentData {
    pub name: String,
    pub vocab: Vocabulary,
    pub pages: FrequencyMatrix<Count>,
}

impl DocumentData {
    pub fn into_document(self) -> Result<Document> {
        Document::from_parts(self.name, self.vocab, self.pages)
    }
}

/// Deserialized form of a `DocumentCollection`
#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub vocab: Vocabulary,
    pub matrix: FrequencyMatrix<TotalCount>,
    pub documents: Vec<DocumentData>,
}

impl CollectionData {
    /// Check every shape invariant, check that each collection column matches
    /// its document's totals, then recompute TF-IDF.
    pub fn into_collection(self) -> Result<DocumentCollection> {
        let docs = self
            .documents
            .into_iter()
            .map(DocumentData::into_document)
            .collect::<Result<Vec<_>>>()?;
        let collection = DocumentCollection::from_parts(docs, self.vocab, self.matrix)?;

        let vocab = collection.vocabulary();
        let matrix = collection.matrix();
        for (id, doc) in collection.documents().iter().enumerate() {
            let mut doc_sum = 0u64;
            for (term, total) in doc.total_frequency_pairs() {
                doc_sum = doc_sum.saturating_add(total);
                let cell = vocab.lookup(term).and_then(|row| matrix.get(row, id));
                if cell != Some(total) {
                    return Err(IndexError::ShapeMismatch(format!(
                        "collection column {} disagrees with document {:?} on term {:?}",
                        id,
                        doc.name(),
                        term
                    )));
                }
            }
            let column_sum = matrix
                .rows()
                .iter()
                .fold(0u64, |sum, row| sum.saturating_add(row[id]));
            if column_sum != doc_sum {
                return Err(IndexError::ShapeMismatch(format!(
                    "collection column {} holds terms document {:?} does not have",
                    id,
                    doc.name()
                )));
            }
        }
        Ok(collection)
    }
}

fn corrupt(err: impl ToString) -> IndexError {
    IndexError::SnapshotCorrupt(err.to_string())
}

impl DocumentCollection {
    /// Write header and body to `writer`
    pub fn write_snapshot<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        serde_cbor::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a snapshot written by `write_snapshot`.
    /// A foreign header or a body that breaks any index invariant is `SnapshotCorrupt`;
    /// another format version is `SnapshotVersion`.
    pub fn read_snapshot<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(corrupt)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(corrupt("not a library snapshot"));
        }
        let mut version = [0u8; 4];
        reader.read_exact(&mut version).map_err(corrupt)?;
        let version = u32::from_le_bytes(version);
        if version != SNAPSHOT_VERSION {
            return Err(IndexError::SnapshotVersion {
                found: version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let data: CollectionData = serde_cbor::from_reader(reader).map_err(corrupt)?;
        data.into_collection().map_err(|e| match e {
            IndexError::ShapeMismatch(_) | IndexError::EmptyDocument(_) | IndexError::EmptyCollection => corrupt(e),
            other => other,
        })
    }

    /// Save to `path`.
    /// Written to a uniquely named temporary file in the same directory and
    /// persisted over `path`, so an interrupted save never leaves a truncated
    /// snapshot behind. The temporary file is removed if writing fails.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write_snapshot(BufWriter::new(&mut tmp))?;
        tmp.persist(path).map_err(|e| e.error)?;
        log::info!(
            "saved snapshot of {} documents ({} terms) to {}",
            self.len(),
            self.vocabulary().len(),
            path.display()
        );
        Ok(())
    }

    /// Load from `path`; a missing file is `SnapshotNotFound`
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(IndexError::SnapshotNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let collection = Self::read_snapshot(BufReader::new(file))?;
        log::info!(
            "loaded snapshot of {} documents ({} terms) from {}",
            collection.len(),
            collection.vocabulary().len(),
            path.display()
        );
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BagOfWords;

    fn bag(pairs: &[(&str, i64)]) -> BagOfWords {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    fn sample() -> DocumentCollection {
        let first = Document::from_pages("first", &[bag(&[("a", 1), ("b", 2)]), bag(&[("c", 3)])]).unwrap();
        let second = Document::new("second", &bag(&[("c", 1), ("d", 4)])).unwrap();
        DocumentCollection::new(vec![first, second]).unwrap()
    }

    fn encode(collection: &DocumentCollection) -> Vec<u8> {
        let mut buf = Vec::new();
        collection.write_snapshot(&mut buf).unwrap();
        buf
    }

    #[test]
    fn round_trip_in_memory() {
        let original = sample();
        let restored = DocumentCollection::read_snapshot(encode(&original).as_slice()).unwrap();

        assert_eq!(restored.vocabulary(), original.vocabulary());
        assert_eq!(restored.matrix(), original.matrix());
        assert_eq!(restored.tfidf(), original.tfidf());
        assert_eq!(restored.len(), 2);
        for (a, b) in restored.documents().iter().zip(original.documents()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.vocabulary(), b.vocabulary());
            assert_eq!(a.pages(), b.pages());
            assert_eq!(a.tfidf(), b.tfidf());
        }
    }

    #[test]
    fn header_starts_with_magic_and_version() {
        let bytes = encode(&sample());
        assert_eq!(&bytes[..8], SNAPSHOT_MAGIC);
        assert_eq!(&bytes[8..12], &SNAPSHOT_VERSION.to_le_bytes());
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut bytes = encode(&sample());
        bytes[0] = b'X';
        let err = DocumentCollection::read_snapshot(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotCorrupt(_)));
    }

    #[test]
    fn rejects_other_version() {
        let mut bytes = encode(&sample());
        bytes[8..12].copy_from_slice(&9u32.to_le_bytes());
        let err = DocumentCollection::read_snapshot(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotVersion { found: 9, expected: 1 }));
    }

    #[test]
    fn rejects_truncated_body() {
        let bytes = encode(&sample());
        let err = DocumentCollection::read_snapshot(&bytes[..bytes.len() - 5]).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotCorrupt(_)));

        let err = DocumentCollection::read_snapshot(&bytes[..3]).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotCorrupt(_)));
    }

    #[test]
    fn rejects_inconsistent_body() {
        // collection matrix claims a count the document does not have
        #[derive(Serialize)]
        struct Tampered<'a> {
            vocab: &'a Vocabulary,
            matrix: FrequencyMatrix<TotalCount>,
            documents: &'a [Document],
        }
        let collection = sample();
        let other = DocumentCollection::new(vec![
            Document::new("x", &bag(&[("a", 9), ("b", 2), ("c", 3)])).unwrap(),
            Document::new("y", &bag(&[("c", 1), ("d", 4)])).unwrap(),
        ])
        .unwrap();
        assert_eq!(other.vocabulary(), collection.vocabulary());
        let tampered = Tampered {
            vocab: collection.vocabulary(),
            matrix: other.matrix().clone(),
            documents: collection.documents(),
        };
        let mut bytes = Vec::new();
        bytes.extend_from_slice(SNAPSHOT_MAGIC);
        bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        serde_cbor::to_writer(&mut bytes, &tampered).unwrap();

        let err = DocumentCollection::read_snapshot(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotCorrupt(_)));
    }

    #[test]
    fn save_leaves_neighbouring_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.snapshot");
        let neighbour = dir.path().join("library.tmp");
        std::fs::write(&neighbour, b"user data").unwrap();

        let collection = sample();
        collection.save_snapshot(&path).unwrap();
        collection.save_snapshot(&path).unwrap();

        assert_eq!(std::fs::read(&neighbour).unwrap(), b"user data");
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(names, vec!["library.snapshot", "library.tmp"]);
        let restored = DocumentCollection::load_snapshot(&path).unwrap();
        assert_eq!(restored.matrix(), collection.matrix());
    }

    #[test]
    fn failed_save_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        // the target is a directory, so persisting over it fails
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();

        assert!(sample().save_snapshot(&target).is_err());
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["occupied"]);
    }
}
