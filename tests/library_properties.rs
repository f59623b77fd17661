//! End-to-end properties of the index through the public API.

use tfidf_library::{
    BagOfWords, CollectionTFIDFEngine, Document, DocumentCollection, FrequencyMatrix, IndexError, PageTFIDFEngine,
    TFIDFEngine, Vocabulary,
};

// ==================== Helpers ====================

fn bag(pairs: &[(&str, i64)]) -> BagOfWords {
    pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
}

/// tiny deterministic PRNG (xorshift32)
struct Rng(u32);
impl Rng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn page(&mut self, vocab_size: u32) -> BagOfWords {
        let words = self.next_u32() % 6;
        (0..words)
            .map(|_| (format!("w{}", self.next_u32() % vocab_size), (self.next_u32() % 5) as i64))
            .collect()
    }
}

// ==================== Growth ====================

#[test]
fn shape_invariant_after_every_addition() {
    let mut rng = Rng(0x1234_5678);
    let mut docs = Vec::new();
    for d in 0..6 {
        let mut doc = Document::new(format!("doc{d}"), &rng.page(40)).unwrap();
        assert_eq!(doc.pages().row_count(), doc.vocabulary().len());
        for p in 1..8 {
            doc.add_page(&rng.page(40)).unwrap();
            assert_eq!(doc.pages().row_count(), doc.vocabulary().len());
            assert_eq!(doc.pages().unit_count(), p + 1);
            assert_eq!(doc.tfidf().row_count(), doc.vocabulary().len());
        }
        docs.push(doc);
    }

    let mut collection = DocumentCollection::new(vec![docs.remove(0)]).unwrap();
    for (i, doc) in docs.into_iter().enumerate() {
        collection.add_doc(doc).unwrap();
        assert_eq!(collection.matrix().row_count(), collection.vocabulary().len());
        assert_eq!(collection.matrix().unit_count(), i + 2);
        assert_eq!(collection.tfidf().unit_count(), i + 2);
    }
}

#[test]
fn document_totals_round_trip() {
    let doc = Document::new("ab", &bag(&[("a", 2), ("b", 3)])).unwrap();
    let totals: Vec<(&str, u64)> = doc.total_frequency_pairs().collect();
    assert_eq!(totals, vec![("a", 2), ("b", 3)]);
}

#[test]
fn document_totals_past_u32_fit_the_collection() {
    let mut collection = DocumentCollection::new(vec![Document::new("ok", &bag(&[("a", 1)])).unwrap()]).unwrap();
    let heavy = Document::from_pages("heavy", &[bag(&[("x", 3_000_000_000)]), bag(&[("x", 3_000_000_000)])]).unwrap();
    assert_eq!(heavy.total_frequencies().get("x"), Some(&6_000_000_000));

    collection.add_doc(heavy).unwrap();
    let x = collection.vocabulary().lookup("x").unwrap();
    assert_eq!(collection.matrix().row(x).unwrap(), &[0, 6_000_000_000]);
    assert_eq!(collection.matrix().column_sums(), vec![1.0, 6_000_000_000.0]);
    assert_eq!(collection.best_matches(&["x"], 2)[0].name, "heavy");
}

#[test]
fn rejected_page_leaves_document_unchanged() {
    let mut doc = Document::new("doc", &bag(&[("a", 1)])).unwrap();
    let err = doc.add_page(&bag(&[("new", 1), ("a", -2)])).unwrap_err();
    assert!(matches!(err, IndexError::NegativeCount { .. }));
    let err = doc.add_page(&bag(&[("new", 1), ("a", u32::MAX as i64 + 1)])).unwrap_err();
    assert!(matches!(err, IndexError::CountOverflow { .. }));
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.vocabulary().len(), 1);
    assert_eq!(doc.pages().unit_count(), 1);
}

// ==================== TF-IDF ====================

#[test]
fn uniform_term_has_zero_weight_everywhere() {
    let mut vocab = Vocabulary::new();
    let mut matrix = FrequencyMatrix::<u32>::new();
    for extra in ["p", "q", "r", "s"] {
        matrix.grow(&mut vocab, &[("same", 7), (extra, 1)]).unwrap();
    }
    let row = vocab.lookup("same").unwrap();
    assert_eq!(matrix.doc_freqs()[row], 4);
    for tfidf in [PageTFIDFEngine::weigh(&matrix), CollectionTFIDFEngine::weigh(&matrix)] {
        assert!(tfidf.row(row).unwrap().iter().all(|w| *w == 0.0));
    }
}

#[test]
fn two_document_scenario() {
    let collection = DocumentCollection::new(vec![
        Document::new("doc0", &bag(&[("x", 1), ("y", 0)])).unwrap(),
        Document::new("doc1", &bag(&[("x", 1), ("y", 1)])).unwrap(),
    ])
    .unwrap();
    let vocab = collection.vocabulary();
    let x = vocab.lookup("x").unwrap();
    let y = vocab.lookup("y").unwrap();

    assert_eq!(collection.matrix().row(x).unwrap(), &[1, 1]);
    assert_eq!(collection.matrix().row(y).unwrap(), &[0, 1]);
    assert_eq!(collection.matrix().column_sums(), vec![1.0, 2.0]);

    let tfidf = collection.tfidf();
    assert_eq!(tfidf.get(x, 0), Some(0.0));
    assert_eq!(tfidf.get(x, 1), Some(0.0));
    assert!((tfidf.get(y, 1).unwrap() - 0.346_573_590_279_972_6).abs() < 1e-12);

    let hits = collection.search(&["y"]);
    assert_eq!(hits.list[0].0, 1);
    assert_eq!(hits.list[1], (0, 0.0));
}

// ==================== Search ====================

#[test]
fn unknown_terms_give_all_zero_scores() {
    let collection = DocumentCollection::new(vec![
        Document::from_pages(
            "a",
            &[bag(&[("apple", 1)]), bag(&[("apricot", 2)]), bag(&[("apple", 1), ("avocado", 4)])],
        )
        .unwrap(),
        Document::new("b", &bag(&[("banana", 2)])).unwrap(),
        Document::new("c", &bag(&[("cherry", 3)])).unwrap(),
    ])
    .unwrap();
    let hits = collection.search(&["durian", "elderberry"]);
    assert_eq!(hits.len(), 3);
    assert!(hits.is_no_match());
    assert_eq!(hits.unknown_terms.len(), 2);
    assert!(collection.best_matches(&["durian"], 2).is_empty());

    let doc = collection.document(0).unwrap();
    assert_eq!(doc.page_count(), 3);
    let pages = doc.search(&["durian"]);
    assert_eq!(pages.len(), 3);
    assert!(pages.is_no_match());
    assert!(pages.list.iter().all(|(_, score)| *score == 0.0));
}

// ==================== Similarity ====================

#[test]
fn similar_documents_has_n_minus_one_sorted_entries() {
    let mut rng = Rng(0xDEAD_BEEF);
    let docs: Vec<Document> = (0..7)
        .map(|d| {
            let pages: Vec<BagOfWords> = (0..3).map(|_| rng.page(12)).collect();
            Document::from_pages(format!("d{d}"), &pages).unwrap()
        })
        .collect();
    let collection = DocumentCollection::new(docs).unwrap();

    for id in 0..collection.len() {
        let hits = collection.similar_documents(id).unwrap();
        assert_eq!(hits.len(), collection.len() - 1);
        assert!(hits.list.iter().all(|(other, _)| *other != id));
        for pair in hits.list.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }

        let self_sim = collection.cosine_similarity(id, id).unwrap();
        let column = collection.matrix().column(id).unwrap();
        if column.iter().all(|v| *v == 0.0) {
            assert_eq!(self_sim, 0.0);
        } else {
            assert!((self_sim - 1.0).abs() < 1e-9);
        }
    }
}

// ==================== Snapshot ====================

#[test]
fn snapshot_file_round_trip_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.snapshot");

    let missing = DocumentCollection::load_snapshot(&path).unwrap_err();
    assert!(matches!(missing, IndexError::SnapshotNotFound(_)));

    let collection = DocumentCollection::new(vec![
        Document::from_pages("first", &[bag(&[("a", 1)]), bag(&[("b", 2), ("a", 1)])]).unwrap(),
        Document::new("second", &bag(&[("c", 5)])).unwrap(),
    ])
    .unwrap();
    collection.save_snapshot(&path).unwrap();

    let restored = DocumentCollection::load_snapshot(&path).unwrap();
    assert_eq!(restored.vocabulary(), collection.vocabulary());
    assert_eq!(restored.matrix(), collection.matrix());
    assert_eq!(restored.documents()[0].pages(), collection.documents()[0].pages());
    assert_eq!(restored.search(&["b"]).list, collection.search(&["b"]).list);

    std::fs::write(&path, b"garbage").unwrap();
    let corrupt = DocumentCollection::load_snapshot(&path).unwrap_err();
    assert!(matches!(corrupt, IndexError::SnapshotCorrupt(_)));
}
