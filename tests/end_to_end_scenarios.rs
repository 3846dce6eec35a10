//! The literal end-to-end scenarios spelled out for the search pipeline:
//! fuzzy typo tolerance, alphanumeric-segmented identifiers, German prefix
//! matching, field-weighted record search, large-corpus cache hits, and
//! phrase search ranking.

use fuzzy_engine::{BuildOptions, Engine, EngineConfig, Item, MatchTypeLabel, SearchOptions};

#[test]
fn fuzzy_typo_ranks_apple_above_apricot_and_excludes_banana() {
    let items = vec![Item::text("apple"), Item::text("apricot"), Item::text("banana")];
    let mut engine = Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap();

    let mut options = SearchOptions::default();
    options.max_results = Some(3);
    let results = engine.search("aple", options).unwrap();

    assert_eq!(results[0].base_id, "apple");
    assert_eq!(results[0].match_type, Some(MatchTypeLabel::Fuzzy));
    assert!(results[0].score >= 0.6 && results[0].score <= 0.9);
    assert!(results.iter().all(|r| r.base_id != "banana"));
}

#[test]
fn alphanumeric_segmentation_finds_close_identifier_among_distractors() {
    let items = vec![
        "datamanager3561",
        "datamanager561",
        "datamanager6561",
        "tgmhnavyc",
        "client_daqub",
        "wjdaq",
    ]
    .into_iter()
    .map(Item::text)
    .collect();

    let mut config = EngineConfig::balanced();
    config.fuzzy_threshold = 0.1;
    config.max_edit_distance = 2;
    config.enable_alphanumeric_segmentation = true;
    let mut engine = Engine::build(items, config, BuildOptions::default()).unwrap();

    let mut options = SearchOptions::default();
    options.fuzzy_threshold = Some(0.1);
    let results = engine.search("daqamanager3561", options).unwrap();

    assert_eq!(results[0].base_id, "datamanager3561");
    assert!(results[0].score > 0.7, "score was {}", results[0].score);
}

#[test]
fn german_processor_matches_krankenhaus_as_a_prefix() {
    let items = vec!["Krankenhaus", "Apotheke", "Arzt", "Krankenpflege"].into_iter().map(Item::text).collect();
    let mut config = EngineConfig::balanced();
    config.languages = vec!["german".to_string()];
    let mut engine = Engine::build(items, config, BuildOptions::default()).unwrap();

    let results = engine.search("krankenh", SearchOptions::default()).unwrap();

    let top = results.iter().find(|r| r.base_id == "Krankenhaus").expect("Krankenhaus present");
    assert_eq!(top.match_type, Some(MatchTypeLabel::Prefix));
    assert!(top.score >= 0.7);
}

#[test]
fn field_weighted_record_search_attributes_match_to_description_field() {
    let items = vec![
        Item::record([("name".to_string(), "iPhone".to_string()), ("description".to_string(), "Smartphone".to_string())]),
        Item::record([("name".to_string(), "MacBook".to_string()), ("description".to_string(), "Laptop".to_string())]),
    ];
    let mut options = BuildOptions::default();
    options.fields = vec!["name".to_string(), "description".to_string()];
    options.field_weights.insert("name".to_string(), 2.0);
    options.field_weights.insert("description".to_string(), 1.0);

    let mut engine = Engine::build(items, EngineConfig::balanced(), options).unwrap();
    let results = engine.search("laptop", SearchOptions::default()).unwrap();

    assert_eq!(results[0].base_id, "MacBook");
    assert_eq!(results[0].matched_field.as_deref(), Some("description"));
    assert!(results[0].score <= 1.0);
}

#[test]
fn large_corpus_exact_match_completes_and_repeat_query_hits_cache() {
    let mut items: Vec<Item> = (0..50_000).map(|i| Item::text(format!("identifier{i}"))).collect();
    items.push(Item::text("apiutil3807"));

    let mut config = EngineConfig::balanced();
    config.performance = fuzzy_engine::PerformanceMode::Balanced;
    let mut engine = Engine::build(items, config, BuildOptions::default()).unwrap();

    let results = engine.search("apiutil3807", SearchOptions::default()).unwrap();
    assert_eq!(results[0].base_id, "apiutil3807");
    assert_eq!(results[0].match_type, Some(MatchTypeLabel::Exact));
    assert_eq!(results[0].score, 1.0);

    let stats_before = engine.cache_stats().unwrap();
    engine.search("apiutil3807", SearchOptions::default()).unwrap();
    let stats_after = engine.cache_stats().unwrap();
    assert!(stats_after.hits > stats_before.hits);
}

#[test]
fn quoted_phrase_ranks_exact_phrase_above_proximity_and_excludes_unrelated() {
    let items = vec![Item::text("New York Pizza"), Item::text("New Pizza York"), Item::text("New Yorker Bagel")];
    let mut engine = Engine::build(items, EngineConfig::comprehensive(), BuildOptions::default()).unwrap();

    let mut options = SearchOptions::default();
    options.fuzzy_threshold = Some(0.0);
    let results = engine.search("\"new york\" pizza", options).unwrap();

    assert_eq!(results[0].base_id, "New York Pizza");
    let ny_pizza_rank = results.iter().position(|r| r.base_id == "New York Pizza").unwrap();
    if let Some(proximity_rank) = results.iter().position(|r| r.base_id == "New Pizza York") {
        assert!(proximity_rank > ny_pizza_rank);
    }
}
