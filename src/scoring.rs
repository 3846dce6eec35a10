//! The scoring pipeline (§4.9): per-match-type base scores, the
//! alphanumeric override, BM25 blending, field-weight multiplier, and the
//! fuzzy threshold cut.

use crate::config::{Bm25Config, EngineConfig, MatchTypeScores};
use crate::index::bm25::Bm25Stats;
use crate::index::postings::PostingTable;
use crate::index::{Candidate, MatchType};
use crate::text::edit_distance::{bounded_levenshtein, distance_to_similarity, EditScratch};
use crate::text::segment::{alpha_only, is_mixed_alphanumeric, numeric_only};

/// Base match-type score before any blending/multiplier is applied.
pub fn base_score(candidate: &Candidate, query: &str, scores: &MatchTypeScores) -> f64 {
    match candidate.match_type {
        MatchType::Exact => scores.exact,
        MatchType::Prefix => scores.prefix,
        MatchType::Substring => scores.substring,
        MatchType::Fuzzy => {
            let distance = candidate.distance.unwrap_or(0) as f64;
            let denom = query.chars().count().max(candidate.matched_key.chars().count()).max(1) as f64;
            (scores.fuzzy - (distance / denom) * 0.3).max(scores.fuzzy_min)
        }
        MatchType::Phonetic => scores.phonetic,
        MatchType::Synonym => scores.synonym,
        MatchType::Compound => scores.compound,
        MatchType::Ngram => candidate.ngram_similarity.unwrap_or(0.0) * scores.ngram,
    }
}

/// Alphanumeric override (§4.3, §4.9): when both the query and the matched
/// term look like mixed alphanumeric identifiers and the flag is enabled,
/// the fuzzy score is recomputed from independently-scored alpha and
/// numeric projections.
pub fn alphanumeric_override(query: &str, matched: &str, config: &EngineConfig, scratch: &mut EditScratch) -> Option<f64> {
    if !config.enable_alphanumeric_segmentation {
        return None;
    }
    if !is_mixed_alphanumeric(query) || !is_mixed_alphanumeric(matched) {
        return None;
    }

    let query_alpha = alpha_only(query);
    let matched_alpha = alpha_only(matched);
    let alpha_len = query_alpha.chars().count().max(matched_alpha.chars().count()).max(1) as f64;
    let alpha_ceiling = alpha_len as u32;
    let alpha_dist = bounded_levenshtein(&query_alpha, &matched_alpha, alpha_ceiling, scratch) as f64;
    let sim_alpha = (1.0 - alpha_dist / alpha_len).clamp(0.0, 1.0);

    let query_numeric = numeric_only(query);
    let matched_numeric = numeric_only(matched);
    let sim_numeric = if matched_numeric.contains(&query_numeric) || query_numeric.contains(&matched_numeric) {
        1.0
    } else {
        let query_numeric_len = query_numeric.chars().count();
        let matched_numeric_len = matched_numeric.chars().count();
        let numeric_len = query_numeric_len.max(matched_numeric_len).max(1) as f64;
        let inflated_ceiling = (numeric_len * config.alphanumeric_numeric_edit_distance_multiplier).ceil() as u32;
        let numeric_dist = bounded_levenshtein(&query_numeric, &matched_numeric, inflated_ceiling, scratch);
        distance_to_similarity(numeric_dist, query_numeric_len, matched_numeric_len)
    };

    let blended = config.alphanumeric_alpha_weight * sim_alpha + config.alphanumeric_numeric_weight * sim_numeric;
    Some(blended.max(0.3))
}

/// BM25 blending (§4.9): `score = wBM25 · BM25norm + (1 − wBM25) · baseScore`.
pub fn blend_bm25(
    base: f64,
    doc_id: crate::index::DocId,
    term: &str,
    stats: &Bm25Stats,
    postings: &PostingTable,
    max_raw_bm25: f64,
    config: &EngineConfig,
) -> f64 {
    if !config.use_bm25 || max_raw_bm25 <= 0.0 {
        return base;
    }
    let bm25_config: &Bm25Config = &config.bm25_config;
    let idf = stats.idf(postings, term, bm25_config);
    let raw = stats.term_score(doc_id, 1.0, idf, bm25_config);
    let normalized = Bm25Stats::normalize(raw, max_raw_bm25);
    config.bm25_weight * normalized + (1.0 - config.bm25_weight) * base
}

/// Field-weight multiplier, clamped to 1.0.
pub fn apply_field_weight(score: f64, weight: f64) -> f64 {
    (score * weight).min(1.0)
}

/// Per-term scoring adjustment (`config.scoring_modifiers`): a caller-
/// supplied multiplicative boost or penalty for a specific matched term,
/// looked up case-insensitively and clamped to 1.0 the same way as the
/// field-weight multiplier. Absent entries leave the score untouched.
pub fn apply_scoring_modifier(score: f64, matched_key: &str, config: &EngineConfig) -> f64 {
    match config.scoring_modifiers.get(&matched_key.to_lowercase()) {
        Some(&modifier) => (score * modifier).min(1.0),
        None => score,
    }
}

/// `true` when `score` clears the configured fuzzy threshold.
pub fn passes_threshold(score: f64, config: &EngineConfig) -> bool {
    score >= config.fuzzy_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn candidate(match_type: MatchType, distance: Option<u32>) -> Candidate {
        Candidate { doc_id: 0, match_type, matched_key: "apple".into(), distance, ngram_similarity: None }
    }

    #[test]
    fn exact_match_scores_one() {
        let scores = MatchTypeScores::default();
        let score = base_score(&candidate(MatchType::Exact, None), "apple", &scores);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn fuzzy_score_decays_with_distance_but_floors_at_min() {
        let scores = MatchTypeScores::default();
        let close = base_score(&candidate(MatchType::Fuzzy, Some(1)), "aple", &scores);
        let far = base_score(&candidate(MatchType::Fuzzy, Some(10)), "aple", &scores);
        assert!(close > far);
        assert!(far >= scores.fuzzy_min);
    }

    #[test]
    fn field_weight_multiplier_is_clamped_to_one() {
        assert_eq!(apply_field_weight(0.9, 2.0), 1.0);
        assert_eq!(apply_field_weight(0.5, 1.0), 0.5);
    }

    #[test]
    fn alphanumeric_override_blends_alpha_and_numeric_similarity() {
        let mut config = EngineConfig::balanced();
        config.enable_alphanumeric_segmentation = true;
        let mut scratch = EditScratch::default();
        let score = alphanumeric_override("datamanager3561", "datamanager561", &config, &mut scratch);
        assert!(score.is_some());
        assert!(score.unwrap() > 0.3);
    }

    #[test]
    fn scoring_modifier_boosts_a_specific_term_and_leaves_others_untouched() {
        let mut config = EngineConfig::balanced();
        config.scoring_modifiers.insert("apple".to_string(), 1.5);
        assert_eq!(apply_scoring_modifier(0.5, "APPLE", &config), 0.75);
        assert_eq!(apply_scoring_modifier(0.5, "banana", &config), 0.5);
        assert_eq!(apply_scoring_modifier(0.9, "apple", &config), 1.0);
    }

    #[test]
    fn threshold_rejects_low_scores() {
        let config = EngineConfig::balanced();
        assert!(!passes_threshold(config.fuzzy_threshold - 0.01, &config));
        assert!(passes_threshold(config.fuzzy_threshold, &config));
    }
}
