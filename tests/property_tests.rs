//! Property-based tests over the full engine, covering the invariants that
//! need a live index rather than a single kernel function: exact retrieval,
//! case/accent invariance, top-K ordering, cache coherence, and idempotent
//! add/remove. Edit-distance boundedness, trie/postings consistency, and
//! Bloom no-false-negatives are exercised closer to their own kernels
//! (`text::edit_distance`, `index::inverted`, `index::bloom`).

use fuzzy_engine::{BuildOptions, Engine, EngineConfig, Item, SearchOptions};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z]{3,10}"
}

fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(identifier(), 1..12).prop_map(|mut words| {
        words.sort();
        words.dedup();
        words
    })
}

proptest! {
    /// Property 1: a query equal to `normalize(s)` returns s with score 1.0.
    #[test]
    fn exact_retrieval_always_scores_one(words in corpus()) {
        let items: Vec<Item> = words.iter().map(|w| Item::text(w.clone())).collect();
        let mut engine = Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap();
        for word in &words {
            let results = engine.search(word, SearchOptions::default()).unwrap();
            let hit = results.iter().find(|r| &r.base_id == word);
            prop_assert!(hit.is_some());
            prop_assert_eq!(hit.unwrap().score, 1.0);
        }
    }

    /// Property 2: an uppercased variant of an inserted string still finds
    /// it, scoring at least the prefix score (exact match after
    /// normalization clears that bar trivially).
    #[test]
    fn case_variant_query_still_finds_the_document(words in corpus()) {
        let items: Vec<Item> = words.iter().map(|w| Item::text(w.clone())).collect();
        let mut engine = Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap();
        for word in &words {
            let upper: String = word.to_uppercase();
            let results = engine.search(&upper, SearchOptions::default()).unwrap();
            let hit = results.iter().find(|r| &r.base_id == word);
            prop_assert!(hit.is_some());
            prop_assert!(hit.unwrap().score >= 0.7);
        }
    }

    /// Property 7: results come back sorted by score descending whenever no
    /// custom sort is requested.
    #[test]
    fn results_are_sorted_by_score_descending(words in corpus()) {
        let items: Vec<Item> = words.iter().map(|w| Item::text(w.clone())).collect();
        let mut engine = Engine::build(items, EngineConfig::comprehensive(), BuildOptions::default()).unwrap();
        if let Some(first) = words.first() {
            let mut options = SearchOptions::default();
            options.fuzzy_threshold = Some(0.0);
            let results = engine.search(&first[..first.len().min(3)], options).unwrap();
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    /// Property 8: repeating the same query returns identical results while
    /// the index is unchanged (served from cache on the second call).
    #[test]
    fn repeat_query_is_cache_coherent(words in corpus()) {
        let items: Vec<Item> = words.iter().map(|w| Item::text(w.clone())).collect();
        let mut engine = Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap();
        if let Some(first) = words.first() {
            let first_call = engine.search(first, SearchOptions::default()).unwrap();
            let second_call = engine.search(first, SearchOptions::default()).unwrap();
            prop_assert_eq!(first_call.len(), second_call.len());
            for (a, b) in first_call.iter().zip(second_call.iter()) {
                prop_assert_eq!(&a.base_id, &b.base_id);
                prop_assert_eq!(a.score, b.score);
            }
        }
    }

    /// Property 9: adding an already-present id is a no-op; removing an
    /// absent id is a no-op.
    #[test]
    fn add_and_remove_are_idempotent(words in corpus()) {
        let items: Vec<Item> = words.iter().map(|w| Item::text(w.clone())).collect();
        let mut engine = Engine::build(items.clone(), EngineConfig::balanced(), BuildOptions::default()).unwrap();
        let count_before = engine.document_count();

        engine.add(items).unwrap();
        prop_assert_eq!(engine.document_count(), count_before);

        engine.remove(&["definitely-not-present-xyz".to_string()]);
        prop_assert_eq!(engine.document_count(), count_before);
    }
}
