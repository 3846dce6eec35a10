//! The search orchestrator (§4.10) and its host-facing `Engine` facade:
//! ties together the document store, the chosen index backend, the
//! language processor registry, the scorer, the phrase driver, filters,
//! sort, and the result cache.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, info, instrument};

use crate::builder::{fuzzy_ceiling, process_text, select_processor, should_use_inverted_index, use_damerau};
use crate::cache::{digest_options, CacheKey, CacheStats, ResultCache};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::filters::{sort_results, FieldFilter, SortKey};
use crate::index::document::DocumentStore;
use crate::index::hash_index::HashIndex;
use crate::index::inverted::InvertedIndex;
use crate::index::{merge_candidates, Candidate, MatchType};
use crate::item::Item;
use crate::lang::{LanguageProcessor, ProcessorRegistry};
use crate::phrase_search::{combine_phrase_and_term_scores, match_phrase};
use crate::result::{HighlightSpan, MatchTypeLabel, SearchResult};
use crate::scoring::{alphanumeric_override, apply_field_weight, apply_scoring_modifier, base_score, blend_bm25};
use crate::snapshot::{BackendSnapshot, Bm25Snapshot, BloomSnapshot, DocumentDto, EngineSnapshot, SNAPSHOT_VERSION};
use crate::index::bloom::BloomFilter;
use crate::index::bm25::Bm25Stats;
use crate::index::postings::PostingTable;
use crate::text::edit_distance::EditScratch;
use crate::text::phrase::{parse_phrases, ParsedQuery};
use crate::text::wildcard::{compile_wildcard, is_wildcard_query};
use crate::text::AccentNormalizer;

/// One-time build configuration beyond [`EngineConfig`]: the declared
/// record fields (record mode only) and their weights.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub fields: Vec<String>,
    pub field_weights: AHashMap<String, f64>,
    pub use_inverted_index: Option<bool>,
}

/// Per-call search overrides layered on top of [`EngineConfig`] (§6
/// "Search options").
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub max_results: Option<usize>,
    pub fuzzy_threshold: Option<f64>,
    pub languages: Option<Vec<String>>,
    pub include_highlights: bool,
    pub filters: Vec<FieldFilter>,
    pub sort: Vec<SortKey>,
    /// FQL is an external collaborator (§4.10 step 2); the core only
    /// exposes the flag so a host can short-circuit to its own parser. The
    /// core never interprets it.
    pub enable_fql: bool,
}

enum Backend {
    Inverted(InvertedIndex),
    Hash(HashIndex),
}

/// The embeddable fuzzy search engine.
pub struct Engine {
    config: EngineConfig,
    registry: ProcessorRegistry,
    documents: DocumentStore,
    backend: Backend,
    declared_fields: Vec<String>,
    field_weights: AHashMap<String, f64>,
    field_data: AHashMap<String, AHashMap<String, String>>,
    accents: AccentNormalizer,
    cache: Option<ResultCache>,
}

impl Engine {
    /// Builds a fresh index from `items`. An empty `items` list produces a
    /// valid empty index with the configured processors and cache (§4.14).
    #[instrument(skip(items, config, options), fields(item_count = items.len()))]
    pub fn build(items: Vec<Item>, config: EngineConfig, options: BuildOptions) -> Result<Self> {
        config.validate()?;
        let registry = ProcessorRegistry::from_language_tags(&config.languages)?;
        if registry.is_empty() {
            return Err(EngineError::MissingProcessor(config.languages.join(",")));
        }

        if !options.fields.is_empty() {
            for item in &items {
                if !item.is_record() {
                    return Err(EngineError::FieldMismatch(
                        "build options declared record fields but an item is not a record".to_string(),
                    ));
                }
            }
        } else if items.iter().any(Item::is_record) {
            return Err(EngineError::FieldMismatch(
                "record items supplied without a `fields` declaration".to_string(),
            ));
        }

        let use_inverted = options.use_inverted_index.unwrap_or_else(|| should_use_inverted_index(&config, items.len()));
        let backend = if use_inverted { Backend::Inverted(InvertedIndex::new()) } else { Backend::Hash(HashIndex::new()) };

        let mut engine = Engine {
            cache: config.enable_cache.then(|| ResultCache::new(config.cache_size)),
            config,
            registry,
            documents: DocumentStore::new(),
            backend,
            declared_fields: options.fields,
            field_weights: options.field_weights,
            field_data: AHashMap::default(),
            accents: AccentNormalizer::default(),
        };

        engine.ingest(items)?;
        engine.finalize_build();
        info!(documents = engine.documents.len(), "index built");
        Ok(engine)
    }

    /// Adds `items` to a live index. Duplicate suppression is by canonical
    /// id, lowercased (§4.14); adding an already-present id is a no-op.
    pub fn add(&mut self, items: Vec<Item>) -> Result<()> {
        if !self.declared_fields.is_empty() {
            for item in &items {
                if !item.is_record() {
                    return Err(EngineError::FieldMismatch(
                        "index was built in record mode; add() requires record items".to_string(),
                    ));
                }
            }
        }
        self.ingest(items)?;
        self.finalize_build();
        Ok(())
    }

    /// Removes every id in `ids`. Absent ids are a no-op (§4.14, §8
    /// property 9).
    pub fn remove(&mut self, ids: &[String]) {
        let mut removed_any = false;
        for id in ids {
            if let Some(doc_id) = self.documents.doc_id_for_base_id(id) {
                if self.documents.mark_deleted(id) {
                    match &mut self.backend {
                        Backend::Inverted(index) => index.remove_doc_id(doc_id),
                        Backend::Hash(index) => index.remove_doc_id(doc_id),
                    }
                    self.field_data.remove(&id.to_lowercase());
                    removed_any = true;
                }
            }
        }
        if removed_any {
            self.finalize_build();
        }
    }

    fn ingest(&mut self, items: Vec<Item>) -> Result<()> {
        for item in items {
            let Some(base_id) = item.base_id(&self.declared_fields) else {
                return Err(EngineError::FieldMismatch(
                    "record item is missing the declared first field used as its base id".to_string(),
                ));
            };
            if self.documents.contains_base_id(&base_id) {
                continue;
            }

            let original = item.field(&base_id_field(&self.declared_fields)).unwrap_or(&base_id).to_string();
            let searchable_text = if self.declared_fields.is_empty() {
                base_id.clone()
            } else {
                self.declared_fields
                    .iter()
                    .filter_map(|field| item.field(field))
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            let processor = if self.config.is_auto_language() {
                select_processor(&searchable_text, &self.config, self.registry.all())
                    .cloned()
                    .ok_or_else(|| EngineError::MissingProcessor("auto".to_string()))?
            } else {
                Arc::clone(self.registry.get(&self.config.languages[0])?)
            };

            let processed = process_text(&searchable_text, &processor, &self.config, &self.accents);

            let doc_id = self.documents.insert(
                base_id.clone(),
                original,
                processed.normalized.clone(),
                processed.phonetic.clone(),
                processed.language.clone(),
                processed.compound_parts.clone(),
            );

            match &mut self.backend {
                Backend::Inverted(index) => index.index_document(
                    doc_id,
                    &processed.normalized,
                    &processed.variants,
                    processed.phonetic.as_deref(),
                    &processed.synonyms,
                    &processed.ngrams,
                ),
                Backend::Hash(index) => index.index_document(
                    doc_id,
                    &processed.normalized,
                    &processed.variants,
                    processed.phonetic.as_deref(),
                    &processed.synonyms,
                    &processed.ngrams,
                ),
            }

            if !self.declared_fields.is_empty() {
                if let Item::Record(ref map) = item {
                    self.field_data.insert(base_id.to_lowercase(), map.clone());
                }
            }
        }
        Ok(())
    }

    fn finalize_build(&mut self) {
        if let Backend::Inverted(index) = &mut self.backend {
            if self.config.use_bloom_filter {
                index.rebuild_bloom(self.config.bloom_filter_false_positive_rate);
            }
            if self.config.use_bm25 {
                index.rebuild_bm25(&self.documents);
            }
        }
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Result-cache hit/miss counters, for observability (§4.12). `None`
    /// when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ResultCache::stats)
    }

    /// The full search pipeline (§4.10).
    #[instrument(skip(self, options), fields(query = %query))]
    pub fn search(&mut self, query: &str, options: SearchOptions) -> Result<Vec<SearchResult>> {
        let max_results = options.max_results.unwrap_or(self.config.max_results);

        if query.chars().count() < self.config.min_query_length {
            return Ok(Vec::new());
        }

        let is_wildcard = is_wildcard_query(query);
        let parsed = if is_wildcard { ParsedQuery::default() } else { parse_phrases(query) };

        let (effective_query, stopword_stripped) = if is_wildcard {
            (query.to_string(), false)
        } else {
            self.apply_stop_words(&parsed.terms.join(" "))
        };
        if !is_wildcard && effective_query.trim().is_empty() && !parsed.has_phrases() {
            return Ok(Vec::new());
        }

        let options_digest = digest_options(&[
            &options.languages.clone().unwrap_or_default().join(","),
            &options.fuzzy_threshold.map(|t| t.to_string()).unwrap_or_default(),
            &stopword_stripped.to_string(),
        ]);
        let cache_key = CacheKey::new(query, max_results, options_digest);
        if let Some(cache) = &mut self.cache {
            if let Some(hit) = cache.get(&cache_key) {
                debug!("result cache hit");
                return Ok(hit);
            }
        }

        let languages = options.languages.as_deref().unwrap_or(&self.config.languages);
        let processors: Vec<Arc<dyn LanguageProcessor>> = if self.config.is_auto_language() || languages.iter().any(|l| l == "auto") {
            self.registry.all().cloned().collect()
        } else {
            languages.iter().map(|tag| self.registry.get(tag).map(Arc::clone)).collect::<Result<Vec<_>>>()?
        };

        let mut fuzzy_threshold = options.fuzzy_threshold.unwrap_or(self.config.fuzzy_threshold);
        fuzzy_threshold = fuzzy_threshold.clamp(0.0, 1.0);

        let mut results = if is_wildcard {
            self.search_wildcard(query, fuzzy_threshold, options.include_highlights)?
        } else if parsed.has_phrases() {
            self.search_with_phrases(&parsed.phrases, &effective_query, &processors, fuzzy_threshold, options.include_highlights)
        } else {
            self.search_terms(&effective_query, &processors, fuzzy_threshold, max_results, options.include_highlights)?
        };

        for result in &mut results {
            if let Some(fields) = self.field_data.get(&result.base_id.to_lowercase()) {
                result.fields = fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            }
        }

        results = crate::filters::apply_filters(results, &options.filters);
        results = sort_results(results, &options.sort);
        results.truncate(max_results);

        if let Some(cache) = &mut self.cache {
            cache.put(cache_key, results.clone());
        }

        Ok(results)
    }

    /// If stop-word filtering is enabled and stripping the query of stop
    /// words leaves something non-empty, returns the stripped form;
    /// otherwise restores the original (§4.10 step 4).
    fn apply_stop_words(&self, joined_terms: &str) -> (String, bool) {
        if !self.config.enable_stop_words {
            return (joined_terms.to_string(), false);
        }
        let stop_words: std::collections::HashSet<String> = self
            .config
            .stop_words
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();
        let stripped: Vec<&str> = joined_terms
            .split_whitespace()
            .filter(|w| {
                if stop_words.is_empty() {
                    !crate::lang::english::is_stop_word(&w.to_lowercase())
                } else {
                    !stop_words.contains(&w.to_lowercase())
                }
            })
            .collect();
        if stripped.is_empty() {
            (joined_terms.to_string(), false)
        } else {
            (stripped.join(" "), true)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn search_terms(
        &self,
        query: &str,
        processors: &[Arc<dyn LanguageProcessor>],
        fuzzy_threshold: f64,
        max_results: usize,
        include_highlights: bool,
    ) -> Result<Vec<SearchResult>> {
        let mut all_candidates = Vec::new();
        for processor in processors {
            let normalized = self.accents.normalize(&processor.normalize(query));
            all_candidates.extend(self.gather_candidates(&normalized, processor, max_results));
        }

        let merged = merge_candidates(all_candidates);
        let mut scratch = EditScratch::default();
        let mut results = Vec::new();
        for candidate in merged.into_values() {
            if let Some(result) = self.score_candidate(&candidate, query, fuzzy_threshold, &mut scratch, include_highlights) {
                results.push(result);
            }
        }
        Ok(results)
    }

    /// §6 wildcard queries: `*` stands for any run of characters. Bypasses
    /// every index strategy and scans live documents directly against the
    /// compiled pattern, since a wildcard is a whole-string predicate rather
    /// than a term the index backends key on.
    fn search_wildcard(&self, query: &str, fuzzy_threshold: f64, include_highlights: bool) -> Result<Vec<SearchResult>> {
        let pattern = compile_wildcard(query)
            .map_err(|e| EngineError::Configuration(format!("invalid wildcard query '{query}': {e}")))?;

        let base_score = self.config.match_type_scores.exact;
        let mut results = Vec::new();
        for doc in self.documents.iter_live() {
            if !pattern.is_match(&doc.normalized) {
                continue;
            }
            let matched_field = self.attribute_field(&doc.base_id, &doc.normalized);
            let field_weight = matched_field.as_deref().and_then(|f| self.field_weights.get(f)).copied().unwrap_or(1.0);
            let score = apply_scoring_modifier(apply_field_weight(base_score, field_weight), &doc.normalized, &self.config);
            if score < fuzzy_threshold {
                continue;
            }
            results.push(SearchResult {
                display: doc.original.clone(),
                base_id: doc.base_id.clone(),
                is_synonym: false,
                score,
                language: doc.language.clone(),
                match_type: Some(MatchTypeLabel::Exact),
                highlights: if include_highlights {
                    vec![HighlightSpan { start: 0, end: doc.original.len() }]
                } else {
                    Vec::new()
                },
                matched_field,
                fields: AHashMap::default(),
            });
        }
        Ok(results)
    }

    /// §4.7 strategy fan-out with the §4.10 step 8 adaptive short-circuit.
    fn gather_candidates(&self, query_normalized: &str, processor: &Arc<dyn LanguageProcessor>, max_results: usize) -> Vec<Candidate> {
        let mut candidates = match &self.backend {
            Backend::Inverted(index) => index.exact(query_normalized),
            Backend::Hash(index) => index.exact(query_normalized),
        };
        candidates.extend(match &self.backend {
            Backend::Inverted(index) => index.prefix(query_normalized),
            Backend::Hash(index) => index.prefix(query_normalized),
        });

        let exact_equals_query = candidates.iter().any(|c| c.match_type == MatchType::Exact && c.matched_key == query_normalized);
        if candidates.len() >= max_results && exact_equals_query {
            return candidates;
        }

        let high_quality_count = candidates.len();
        let run_all = high_quality_count < max_results.saturating_mul(2);

        if run_all {
            if crate::builder::has_active_capability(processor, &self.config, crate::lang::Capability::Phonetic) {
                if let Some(code) = processor.phonetic_code(query_normalized) {
                    candidates.extend(match &self.backend {
                        Backend::Inverted(index) => index.phonetic(&code),
                        Backend::Hash(index) => index.phonetic(&code),
                    });
                }
            }
            candidates.extend(match &self.backend {
                Backend::Inverted(index) => index.synonym(query_normalized),
                Backend::Hash(index) => index.synonym(query_normalized),
            });
        } else {
            if crate::builder::has_active_capability(processor, &self.config, crate::lang::Capability::Phonetic) {
                if let Some(code) = processor.phonetic_code(query_normalized) {
                    candidates.extend(match &self.backend {
                        Backend::Inverted(index) => index.phonetic(&code),
                        Backend::Hash(index) => index.phonetic(&code),
                    });
                }
            }
            candidates.extend(match &self.backend {
                Backend::Inverted(index) => index.synonym(query_normalized),
                Backend::Hash(index) => index.synonym(query_normalized),
            });
            if candidates.len() >= max_results.saturating_mul(3) {
                return candidates;
            }
        }

        candidates.extend(match &self.backend {
            Backend::Inverted(index) => index.ngram(query_normalized, self.config.ngram_size),
            Backend::Hash(index) => index.ngram(query_normalized, self.config.ngram_size),
        });

        let use_damerau_variant = use_damerau(self.config.performance);
        let ceiling = fuzzy_ceiling(query_normalized, self.config.max_edit_distance);
        candidates.extend(match &self.backend {
            Backend::Inverted(index) => index.fuzzy(query_normalized, ceiling, use_damerau_variant),
            Backend::Hash(index) => index.fuzzy(query_normalized, ceiling, use_damerau_variant),
        });

        candidates
    }

    fn score_candidate(
        &self,
        candidate: &Candidate,
        query: &str,
        fuzzy_threshold: f64,
        scratch: &mut EditScratch,
        include_highlights: bool,
    ) -> Option<SearchResult> {
        let doc = self.documents.get(candidate.doc_id)?;

        let mut score = base_score(candidate, query, &self.config.match_type_scores);

        if candidate.match_type == MatchType::Fuzzy {
            if let Some(alt) = alphanumeric_override(query, &candidate.matched_key, &self.config, scratch) {
                score = alt;
            }
        }

        if let Backend::Inverted(index) = &self.backend {
            if let Some(stats) = &index.bm25 {
                let max_raw = stats.average_document_length().max(1.0) * 2.0;
                score = blend_bm25(score, candidate.doc_id, &candidate.matched_key, stats, &index.term_postings, max_raw, &self.config);
            }
        }

        let matched_field = self.attribute_field(&doc.base_id, &candidate.matched_key);
        let field_weight = matched_field.as_deref().and_then(|f| self.field_weights.get(f)).copied().unwrap_or(1.0);
        score = apply_field_weight(score, field_weight);
        score = apply_scoring_modifier(score, &candidate.matched_key, &self.config);

        if score < fuzzy_threshold {
            return None;
        }

        let highlights = if include_highlights {
            highlight_spans(&doc.original, &candidate.matched_key)
        } else {
            Vec::new()
        };

        Some(SearchResult {
            display: doc.original.clone(),
            base_id: doc.base_id.clone(),
            is_synonym: candidate.match_type == MatchType::Synonym,
            score,
            language: doc.language.clone(),
            match_type: Some(MatchTypeLabel::from(candidate.match_type)),
            highlights,
            matched_field,
            fields: AHashMap::default(),
        })
    }

    /// §4.11: phrase-aware search, combined with the ordinary term
    /// pipeline for any bare terms in the same query.
    fn search_with_phrases(
        &self,
        phrases: &[String],
        bare_terms: &str,
        processors: &[Arc<dyn LanguageProcessor>],
        fuzzy_threshold: f64,
        include_highlights: bool,
    ) -> Vec<SearchResult> {
        let mut by_base_id: AHashMap<String, (f64, &crate::index::document::Document)> = AHashMap::default();

        let term_scores: AHashMap<String, f64> = if bare_terms.trim().is_empty() {
            AHashMap::default()
        } else {
            self.search_terms(bare_terms, processors, 0.0, usize::MAX, false)
                .unwrap_or_default()
                .into_iter()
                .map(|r| (r.base_id.to_lowercase(), r.score))
                .collect()
        };

        for doc in self.documents.iter_live() {
            let mut phrase_score_total = None;
            for phrase in phrases {
                let processor = processors.first();
                let normalized_phrase = match processor {
                    Some(p) => self.accents.normalize(&p.normalize(phrase)),
                    None => phrase.to_lowercase(),
                };
                if let Some(m) = match_phrase(&normalized_phrase, &doc.normalized) {
                    phrase_score_total = Some(phrase_score_total.unwrap_or(0.0_f64).max(m.score));
                }
            }
            let term_score = term_scores.get(&doc.base_id.to_lowercase()).copied();
            if phrase_score_total.is_none() && term_score.is_none() {
                continue;
            }
            let combined = combine_phrase_and_term_scores(phrase_score_total, term_score);
            if combined > 0.0 {
                by_base_id.insert(doc.base_id.clone(), (combined, doc));
            }
        }

        by_base_id
            .into_values()
            .map(|(score, doc)| {
                let matched_key = phrases.join(" ");
                let matched_field = self.attribute_field(&doc.base_id, &matched_key);
                let field_weight = matched_field.as_deref().and_then(|f| self.field_weights.get(f)).copied().unwrap_or(1.0);
                let score = apply_scoring_modifier(apply_field_weight(score, field_weight), &matched_key, &self.config);
                (score, matched_field, doc)
            })
            .filter(|(score, _, _)| *score >= fuzzy_threshold)
            .map(|(score, matched_field, doc)| SearchResult {
                display: doc.original.clone(),
                base_id: doc.base_id.clone(),
                is_synonym: false,
                score,
                language: doc.language.clone(),
                match_type: Some(MatchTypeLabel::Phrase),
                highlights: if include_highlights { highlight_spans(&doc.original, &phrases.join(" ")) } else { Vec::new() },
                matched_field,
                fields: AHashMap::default(),
            })
            .collect()
    }

    /// Best-effort attribution of a match to the declared record field whose
    /// value contains the matched text (§6 "the matching field name"). Text
    /// items and non-record indices have no field data, so this is `None`.
    fn attribute_field(&self, base_id: &str, matched_key: &str) -> Option<String> {
        if matched_key.is_empty() {
            return None;
        }
        let fields = self.field_data.get(&base_id.to_lowercase())?;
        let key_lower = matched_key.to_lowercase();
        self.declared_fields
            .iter()
            .find(|field| fields.get(field.as_str()).map(|v| v.to_lowercase().contains(&key_lower)).unwrap_or(false))
            .cloned()
    }

    /// Serializes the full index state to JSON (§6): document store, every
    /// posting table, BM25 stats and Bloom filter if present, and the
    /// language tags used. Language processors themselves are not
    /// serialized; [`Self::restore`] re-materializes them by name.
    pub fn snapshot(&self) -> Result<String> {
        let documents: Vec<DocumentDto> = self
            .documents
            .iter_all()
            .map(|doc| DocumentDto {
                base_id: doc.base_id.clone(),
                original: doc.original.clone(),
                normalized: doc.normalized.clone(),
                phonetic: doc.phonetic.clone(),
                language: doc.language.clone(),
                compound_parts: doc.compound_parts.clone(),
                deleted: doc.deleted,
            })
            .collect();

        let backend = match &self.backend {
            Backend::Inverted(index) => BackendSnapshot::Inverted {
                term_postings: index.term_postings.entries(),
                phonetic_postings: index.phonetic_postings.entries(),
                ngram_postings: index.ngram_postings.entries(),
                synonym_postings: index.synonym_postings.entries(),
                bloom: index.bloom.as_ref().map(|b| BloomSnapshot {
                    bytes: b.to_bytes(),
                    num_bits: b.num_bits(),
                    num_hashes: b.num_hashes(),
                }),
                bm25: index.bm25.as_ref().map(|stats| Bm25Snapshot { doc_lengths: stats.doc_lengths().collect() }),
            },
            Backend::Hash(index) => BackendSnapshot::Hash {
                variant: index.variant_entries(),
                phonetic: index.phonetic_entries(),
                ngram: index.ngram_entries(),
                synonym: index.synonym_entries(),
            },
        };

        let field_data: Vec<(String, Vec<(String, String)>)> = self
            .field_data
            .iter()
            .map(|(id, fields)| (id.clone(), fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
            .collect();

        let snapshot = EngineSnapshot {
            version: SNAPSHOT_VERSION,
            languages: self.config.languages.clone(),
            config: self.config.clone(),
            declared_fields: self.declared_fields.clone(),
            field_weights: self.field_weights.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            field_data,
            documents,
            backend,
        };

        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuilds an engine from a snapshot produced by [`Self::snapshot`].
    /// A version mismatch or malformed payload is fatal (§6). Round-trip
    /// reproduces search behavior exactly, except the cache starts empty.
    pub fn restore(json: &str) -> Result<Self> {
        let snapshot: EngineSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EngineError::Snapshot(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        snapshot.config.validate()?;

        let registry = ProcessorRegistry::from_language_tags(&snapshot.languages)?;
        if registry.is_empty() {
            return Err(EngineError::MissingProcessor(snapshot.languages.join(",")));
        }

        let documents = DocumentStore::from_documents(
            snapshot
                .documents
                .into_iter()
                .enumerate()
                .map(|(id, dto)| crate::index::document::Document {
                    id: id as crate::index::document::DocId,
                    base_id: dto.base_id,
                    original: dto.original,
                    normalized: dto.normalized,
                    phonetic: dto.phonetic,
                    language: dto.language,
                    compound_parts: dto.compound_parts,
                    deleted: dto.deleted,
                })
                .collect(),
        );

        let backend = match snapshot.backend {
            BackendSnapshot::Inverted { term_postings, phonetic_postings, ngram_postings, synonym_postings, bloom, bm25 } => {
                let mut index = InvertedIndex::from_postings(
                    PostingTable::from_entries(term_postings),
                    PostingTable::from_entries(phonetic_postings),
                    PostingTable::from_entries(ngram_postings),
                    PostingTable::from_entries(synonym_postings),
                );
                if let Some(b) = bloom {
                    index.bloom = Some(BloomFilter::from_bytes(&b.bytes, b.num_bits, b.num_hashes));
                }
                if let Some(b) = bm25 {
                    index.bm25 = Some(Bm25Stats::build(b.doc_lengths));
                }
                Backend::Inverted(index)
            }
            BackendSnapshot::Hash { variant, phonetic, ngram, synonym } => {
                Backend::Hash(HashIndex::from_maps(variant, phonetic, ngram, synonym))
            }
        };

        let field_weights: AHashMap<String, f64> = snapshot.field_weights.into_iter().collect();
        let field_data: AHashMap<String, AHashMap<String, String>> = snapshot
            .field_data
            .into_iter()
            .map(|(id, fields)| (id, fields.into_iter().collect()))
            .collect();

        let cache = snapshot.config.enable_cache.then(|| ResultCache::new(snapshot.config.cache_size));

        Ok(Engine {
            config: snapshot.config,
            registry,
            documents,
            backend,
            declared_fields: snapshot.declared_fields,
            field_weights,
            field_data,
            accents: AccentNormalizer::default(),
            cache,
        })
    }
}

fn base_id_field(declared_fields: &[String]) -> String {
    declared_fields.first().cloned().unwrap_or_default()
}

/// Finds every byte-offset span of `needle` within `haystack`, case-insensitively.
fn highlight_spans(haystack: &str, needle: &str) -> Vec<HighlightSpan> {
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack_lower = haystack.to_lowercase();
    let needle_lower = needle.to_lowercase();
    let mut spans = Vec::new();
    let mut start = 0;
    while let Some(pos) = haystack_lower[start..].find(&needle_lower) {
        let abs_start = start + pos;
        let abs_end = abs_start + needle_lower.len();
        spans.push(HighlightSpan { start: abs_start, end: abs_end });
        start = abs_end;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(words: &[&str]) -> Engine {
        let items = words.iter().map(|w| Item::text(*w)).collect();
        Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap()
    }

    #[test]
    fn exact_query_returns_score_one() {
        let mut engine = engine_with(&["apple", "apricot", "banana"]);
        let results = engine.search("apple", SearchOptions::default()).unwrap();
        assert_eq!(results[0].base_id, "apple");
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn fuzzy_typo_finds_closest_match() {
        let mut engine = engine_with(&["apple", "apricot", "banana"]);
        let results = engine.search("aple", SearchOptions::default()).unwrap();
        assert_eq!(results[0].base_id, "apple");
        assert!(results.iter().all(|r| r.base_id != "banana"));
    }

    #[test]
    fn all_stopword_query_falls_back_to_original_instead_of_empty() {
        let mut config = EngineConfig::balanced();
        config.enable_stop_words = true;
        let items = vec![Item::text("the cat sat")];
        let mut engine = Engine::build(items, config, BuildOptions::default()).unwrap();
        let results = engine.search("the", SearchOptions::default()).unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn search_is_cached_on_repeat_call() {
        let mut engine = engine_with(&["apple"]);
        let first = engine.search("apple", SearchOptions::default()).unwrap();
        let second = engine.search("apple", SearchOptions::default()).unwrap();
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn remove_then_search_no_longer_finds_it() {
        let mut engine = engine_with(&["apple", "banana"]);
        engine.remove(&["apple".to_string()]);
        let results = engine.search("apple", SearchOptions::default()).unwrap();
        assert!(results.iter().all(|r| r.base_id != "apple"));
    }

    #[test]
    fn phrase_query_ranks_exact_phrase_above_term_only_match() {
        let items = vec![Item::text("New York Pizza"), Item::text("Pizza Place Downtown"), Item::text("Bagel Shop")];
        let mut engine = Engine::build(items, EngineConfig::comprehensive(), BuildOptions::default()).unwrap();
        let mut options = SearchOptions::default();
        options.fuzzy_threshold = Some(0.0);
        let results = engine.search("\"new york\" pizza", options).unwrap();
        assert_eq!(results[0].base_id, "New York Pizza");
        assert!(results.iter().all(|r| r.base_id != "Bagel Shop"));
    }

    #[test]
    fn snapshot_round_trip_reproduces_search_results() {
        let mut engine = engine_with(&["apple", "apricot", "banana"]);
        let before = engine.search("aple", SearchOptions::default()).unwrap();

        let json = engine.snapshot().unwrap();
        let mut restored = Engine::restore(&json).unwrap();
        let after = restored.search("aple", SearchOptions::default()).unwrap();

        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.base_id, b.base_id);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn wildcard_query_is_routed_through_search() {
        let mut engine = engine_with(&["datamanager561", "datamanager999", "unrelated"]);
        let mut options = SearchOptions::default();
        options.fuzzy_threshold = Some(0.0);
        let results = engine.search("data*561", options).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].base_id, "datamanager561");
        assert_eq!(results[0].match_type, Some(MatchTypeLabel::Exact));
    }

    #[test]
    fn wildcard_query_with_no_match_returns_empty() {
        let mut engine = engine_with(&["apple", "banana"]);
        let results = engine.search("zzz*qqq", SearchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn restore_rejects_wrong_version() {
        let engine = engine_with(&["apple"]);
        let json = engine.snapshot().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["version"] = serde_json::json!(999);
        let tampered = serde_json::to_string(&value).unwrap();
        assert!(Engine::restore(&tampered).is_err());
    }
}
