//! The ingestion pipeline (§4.7 construction, §4.14 build/add/remove):
//! per-processor normalization, variant/phonetic/ngram/synonym emission,
//! and the size/feature heuristic that decides which index backend to use.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::lang::{Capability, LanguageProcessor, PerformanceMode};
use crate::text::edit_distance::char_ngrams;
use crate::text::AccentNormalizer;

/// Everything derived from one item's text, ready to hand to either index
/// backend's `index_document`.
pub struct ProcessedDocument {
    pub normalized: String,
    pub variants: Vec<String>,
    pub phonetic: Option<String>,
    pub synonyms: Vec<String>,
    pub ngrams: Vec<String>,
    pub compound_parts: Vec<String>,
    pub language: String,
}

/// A capability only fires when both the processor declares it *and* the
/// configured feature set activates it (§9: presets differentiate which
/// strategies actually run, not just which ones a processor could run).
pub fn has_active_capability(processor: &Arc<dyn LanguageProcessor>, config: &EngineConfig, capability: Capability) -> bool {
    processor.has_capability(capability) && config.features.contains(&capability)
}

/// Runs the full per-document pipeline: normalize, phonetic-code, compound
/// split, word variants, synonym lookup (custom table + processor), and
/// n-grams of the normalized form.
pub fn process_text(
    text: &str,
    processor: &Arc<dyn LanguageProcessor>,
    config: &EngineConfig,
    accents: &AccentNormalizer,
) -> ProcessedDocument {
    let normalized = accents.normalize(&processor.normalize(text));

    let phonetic = if has_active_capability(processor, config, Capability::Phonetic) {
        processor.phonetic_code(&normalized)
    } else {
        None
    };

    let compound_parts = if has_active_capability(processor, config, Capability::Compound) {
        processor.split_compound_words(&normalized)
    } else {
        vec![normalized.clone()]
    };

    let performance = config.performance;
    let mut variants: Vec<String> = processor.word_variants(&normalized, performance);
    if compound_parts.len() > 1 {
        variants.extend(compound_parts.iter().cloned());
    }
    variants.sort();
    variants.dedup();
    variants.retain(|v| v != &normalized);

    let mut synonyms = Vec::new();
    if has_active_capability(processor, config, Capability::Synonyms) {
        synonyms.extend(processor.synonyms(&normalized));
    }
    if let Some(custom) = config.custom_synonyms.get(&normalized) {
        synonyms.extend(custom.iter().cloned());
    }
    synonyms.sort();
    synonyms.dedup();

    let ngrams: Vec<String> = char_ngrams(&normalized, config.ngram_size).into_iter().collect();

    ProcessedDocument {
        normalized,
        variants,
        phonetic,
        synonyms,
        ngrams,
        compound_parts,
        language: processor.language_tag().to_string(),
    }
}

/// Resolves which processor handles one document's text. For a fixed
/// language list this is a direct lookup; for `"auto"` it samples every
/// registered processor and keeps whichever declares [`Capability::Compound`]
/// when the text contains a non-ASCII letter (a German-leaning signal),
/// falling back to the first registered processor otherwise. This is a
/// deliberately simple heuristic — the specification leaves "sampled
/// prefix" auto-detection unspecified beyond that sketch.
pub fn select_processor<'a>(
    text: &str,
    config: &EngineConfig,
    processors: impl Iterator<Item = &'a Arc<dyn LanguageProcessor>>,
) -> Option<&'a Arc<dyn LanguageProcessor>> {
    let mut fallback = None;
    let has_non_ascii_letter = text.chars().any(|c| c.is_alphabetic() && !c.is_ascii());
    for processor in processors {
        if fallback.is_none() {
            fallback = Some(processor);
        }
        if has_non_ascii_letter && has_active_capability(processor, config, Capability::Compound) {
            return Some(processor);
        }
    }
    fallback
}

/// `useInvertedIndex` decision (§9): on at `corpus_size >= 10,000`, or when
/// BM25/Bloom is requested, or when the caller forces it either way.
pub fn should_use_inverted_index(config: &EngineConfig, corpus_size: usize) -> bool {
    if let Some(forced) = config.use_inverted_index {
        return forced;
    }
    corpus_size >= 10_000 || config.use_bm25 || config.use_bloom_filter
}

/// Widens the fuzzy edit-distance ceiling for very short queries, per
/// §4.7's "widened for very short queries (<=3 chars => at least 2)".
pub fn fuzzy_ceiling(query_normalized: &str, max_edit_distance: u32) -> u32 {
    if query_normalized.chars().count() <= 3 {
        max_edit_distance.max(2)
    } else {
        max_edit_distance
    }
}

/// Scales variant generation's implied cost by performance mode; used by
/// the orchestrator to decide whether Damerau-Levenshtein (pricier) or
/// plain Levenshtein backs fuzzy matching.
pub fn use_damerau(performance: PerformanceMode) -> bool {
    matches!(performance, PerformanceMode::Balanced | PerformanceMode::Comprehensive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::EnglishProcessor;
    use std::sync::Arc;

    #[test]
    fn process_text_produces_normalized_and_variants() {
        let processor: Arc<dyn LanguageProcessor> = Arc::new(EnglishProcessor::new());
        let config = EngineConfig::balanced();
        let accents = AccentNormalizer::default();
        let processed = process_text("Running", &processor, &config, &accents);
        assert_eq!(processed.normalized, "running");
        assert!(processed.variants.iter().any(|v| v == "run"));
    }

    #[test]
    fn inverted_index_turns_on_above_size_threshold() {
        let config = EngineConfig::balanced();
        assert!(!should_use_inverted_index(&config, 100));
        assert!(should_use_inverted_index(&config, 20_000));
    }

    #[test]
    fn bm25_request_forces_inverted_index_even_for_small_corpora() {
        let mut config = EngineConfig::balanced();
        config.use_bm25 = true;
        assert!(should_use_inverted_index(&config, 10));
    }

    #[test]
    fn short_query_widens_fuzzy_ceiling_to_at_least_two() {
        assert_eq!(fuzzy_ceiling("ab", 1), 2);
        assert_eq!(fuzzy_ceiling("abcdef", 1), 1);
    }

    #[test]
    fn disabling_a_feature_suppresses_it_even_if_the_processor_supports_it() {
        let processor: Arc<dyn LanguageProcessor> = Arc::new(EnglishProcessor::new());
        let accents = AccentNormalizer::default();

        let mut enabled = EngineConfig::balanced();
        enabled.features.insert(Capability::Phonetic);
        let with_phonetic = process_text("running", &processor, &enabled, &accents);
        assert!(with_phonetic.phonetic.is_some());

        let mut disabled = EngineConfig::balanced();
        disabled.features.remove(&Capability::Phonetic);
        let without_phonetic = process_text("running", &processor, &disabled, &accents);
        assert!(without_phonetic.phonetic.is_none());
    }

    #[test]
    fn select_processor_ignores_compound_signal_when_the_feature_is_off() {
        use crate::lang::GermanProcessor;

        let english: Arc<dyn LanguageProcessor> = Arc::new(EnglishProcessor::new());
        let german: Arc<dyn LanguageProcessor> = Arc::new(GermanProcessor::new());
        let processors = vec![english, german];

        let mut with_compound = EngineConfig::balanced();
        with_compound.features.insert(Capability::Compound);
        let chosen = select_processor("Straße", &with_compound, processors.iter()).unwrap();
        assert_eq!(chosen.language_tag(), "german");

        let mut without_compound = EngineConfig::balanced();
        without_compound.features.remove(&Capability::Compound);
        let chosen = select_processor("Straße", &without_compound, processors.iter()).unwrap();
        assert_eq!(chosen.language_tag(), "english");
    }
}
