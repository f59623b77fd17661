use criterion::{criterion_group, criterion_main, Criterion};
use tfidf_library::{BagOfWords, Document, DocumentCollection};

/// Deterministic synthetic pages: `words` distinct terms drawn from a vocabulary of `vocab`
fn synthetic_page(seed: u32, words: u32, vocab: u32) -> BagOfWords {
    let mut x = seed.max(1);
    (0..words)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (format!("term{}", x % vocab), (x % 7 + 1) as i64)
        })
        .collect()
}

fn build_collection(docs: u32, pages: u32) -> DocumentCollection {
    let docs = (0..docs)
        .map(|d| {
            let pages: Vec<BagOfWords> = (0..pages).map(|p| synthetic_page(d * 1000 + p + 1, 200, 5000)).collect();
            Document::from_pages(format!("doc{d}"), &pages).expect("synthetic document")
        })
        .collect();
    DocumentCollection::new(docs).expect("synthetic collection")
}

fn index_and_search_benchmark(c: &mut Criterion) {
    c.bench_function("build_collection", |b| {
        b.iter(|| build_collection(20, 10));
    });

    let collection = build_collection(50, 10);
    let query = ["term1", "term42", "term999", "missing"];

    c.bench_function("collection_search", |b| {
        b.iter(|| collection.search(&query));
    });

    c.bench_function("similar_documents", |b| {
        b.iter(|| collection.similar_documents(0));
    });
}

criterion_group!(benches, index_and_search_benchmark);
criterion_main!(benches);
