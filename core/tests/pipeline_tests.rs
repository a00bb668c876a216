//! End-to-end: normalize -> vectorize -> build -> persist -> search.

use retriever_core::{persist, tokenizer, Hit, IndexSnapshot, InvertedIndex, Searcher, Vectorizer};

fn build_snapshot(texts: &[(&str, &str)]) -> IndexSnapshot {
    let tokenized: Vec<Vec<String>> =
        texts.iter().map(|(_, body)| tokenizer::normalize(body)).collect();
    let matrix = Vectorizer::default().fit_transform(&tokenized);
    IndexSnapshot {
        index: InvertedIndex::from_matrix(&matrix).unwrap(),
        doc_names: texts.iter().map(|(name, _)| name.to_string()).collect(),
    }
}

#[test]
fn full_pipeline_ranks_relevant_document_first() {
    let snapshot = build_snapshot(&[
        ("pets/cats.txt", "Cats are wonderful pets. A cat purrs when happy."),
        ("pets/dogs.txt", "Dogs bark loudly. A dog loves walks and fetch."),
        ("cooking/soup.txt", "Simmer the soup slowly with fresh vegetables."),
    ]);

    let blob = persist::to_bytes(&snapshot).unwrap();
    let loaded = persist::from_bytes(&blob).unwrap();
    assert_eq!(loaded, snapshot);

    let searcher = Searcher::from_snapshot(loaded).unwrap();
    let q = tokenizer::preprocess_query("happy cats");
    let hits = searcher.query(&q, 20).unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].name, "pets/cats.txt");
}

#[test]
fn unknown_query_terms_are_skipped_not_fatal() {
    let snapshot = build_snapshot(&[
        ("a.txt", "rust compiles fast binaries"),
        ("b.txt", "gardens need water"),
    ]);
    let searcher = Searcher::from_snapshot(snapshot).unwrap();

    let hits = searcher
        .query(&tokenizer::preprocess_query("rust xylophone"), 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "a.txt");

    let none: Vec<Hit> = searcher
        .query(&tokenizer::preprocess_query("xylophone"), 10)
        .unwrap();
    assert!(none.is_empty());
}
