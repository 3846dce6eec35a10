//! Engine configuration: the single structure validated at build time.
//!
//! Follows the teacher's nested-optional-field `serde` pattern
//! (`ProbeConfig`/`SearchConfig`) but flattened to the field list the design
//! calls for, with `fast`/`balanced`/`comprehensive` presets standing in for
//! the teacher's `PerformanceConfig`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::lang::Capability;

/// Sentinel language tag that triggers auto-detection over a sampled prefix
/// of the corpus at build time.
pub const AUTO_LANGUAGE: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceMode {
    Fast,
    Balanced,
    Comprehensive,
}

impl Default for PerformanceMode {
    fn default() -> Self {
        PerformanceMode::Balanced
    }
}

/// BM25 tuning knobs (k1, b and the IDF floor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Config {
    pub k1: f64,
    pub b: f64,
    /// Floor applied to IDF so that very common terms never push the score negative.
    pub min_idf: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Bm25Config {
            k1: 1.2,
            b: 0.75,
            min_idf: 0.0,
        }
    }
}

/// Per-match-type base scores. Defaults resolve the "multiple coexisting
/// defaults" open question (see DESIGN.md) to one explicit set of numbers
/// rather than leaving the behavior ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchTypeScores {
    pub exact: f64,
    pub prefix: f64,
    pub substring: f64,
    pub fuzzy: f64,
    pub fuzzy_min: f64,
    pub phonetic: f64,
    pub synonym: f64,
    pub compound: f64,
    pub ngram: f64,
}

impl Default for MatchTypeScores {
    fn default() -> Self {
        MatchTypeScores {
            exact: 1.0,
            prefix: 0.80,
            substring: 0.78,
            fuzzy: 0.60,
            fuzzy_min: 0.30,
            phonetic: 0.45,
            synonym: 0.40,
            compound: 0.68,
            ngram: 0.50,
        }
    }
}

/// Top-level configuration for [`crate::Engine`], validated once at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Non-empty list of language tags, or `["auto"]` to sample the corpus.
    pub languages: Vec<String>,
    /// Declared capability set the index should activate.
    pub features: HashSet<Capability>,
    pub performance: PerformanceMode,

    pub max_results: usize,
    pub min_query_length: usize,
    pub fuzzy_threshold: f64,
    pub max_edit_distance: u32,
    pub ngram_size: usize,

    #[serde(default)]
    pub custom_synonyms: HashMap<String, Vec<String>>,

    /// `None` lets the builder decide (§9: union of size threshold, BM25/Bloom
    /// request, or explicit override); `Some(_)` forces the choice.
    #[serde(default)]
    pub use_inverted_index: Option<bool>,

    #[serde(default)]
    pub field_weights: HashMap<String, f64>,

    #[serde(default = "default_true")]
    pub enable_cache: bool,
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    #[serde(default)]
    pub enable_stop_words: bool,
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,

    #[serde(default)]
    pub enable_alphanumeric_segmentation: bool,
    #[serde(default = "default_alpha_weight")]
    pub alphanumeric_alpha_weight: f64,
    #[serde(default = "default_numeric_weight")]
    pub alphanumeric_numeric_weight: f64,
    #[serde(default = "default_numeric_multiplier")]
    pub alphanumeric_numeric_edit_distance_multiplier: f64,

    #[serde(default)]
    pub use_bm25: bool,
    #[serde(default = "default_bm25_weight")]
    pub bm25_weight: f64,
    #[serde(default)]
    pub bm25_config: Bm25Config,

    #[serde(default)]
    pub use_bloom_filter: bool,
    #[serde(default = "default_bloom_fp_rate")]
    pub bloom_filter_false_positive_rate: f64,

    #[serde(default)]
    pub match_type_scores: MatchTypeScores,
    /// Per-term multiplicative score adjustment, keyed by the lowercased
    /// matched term (`scoring::apply_scoring_modifier`). A caller-supplied
    /// boost/penalty table, separate from `match_type_scores`' per-strategy
    /// base scores.
    #[serde(default)]
    pub scoring_modifiers: HashMap<String, f64>,
}

fn default_true() -> bool {
    true
}
fn default_cache_size() -> usize {
    100
}
fn default_alpha_weight() -> f64 {
    0.7
}
fn default_numeric_weight() -> f64 {
    0.3
}
fn default_numeric_multiplier() -> f64 {
    1.5
}
fn default_bm25_weight() -> f64 {
    0.6
}
fn default_bloom_fp_rate() -> f64 {
    0.01
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::balanced()
    }
}

impl EngineConfig {
    fn skeleton(performance: PerformanceMode, fuzzy_threshold: f64, max_edit_distance: u32) -> Self {
        EngineConfig {
            languages: vec!["english".to_string()],
            features: HashSet::new(),
            performance,
            max_results: 10,
            min_query_length: 1,
            fuzzy_threshold,
            max_edit_distance,
            ngram_size: 3,
            custom_synonyms: HashMap::new(),
            use_inverted_index: None,
            field_weights: HashMap::new(),
            enable_cache: true,
            cache_size: default_cache_size(),
            enable_stop_words: false,
            stop_words: None,
            enable_alphanumeric_segmentation: false,
            alphanumeric_alpha_weight: default_alpha_weight(),
            alphanumeric_numeric_weight: default_numeric_weight(),
            alphanumeric_numeric_edit_distance_multiplier: default_numeric_multiplier(),
            use_bm25: false,
            bm25_weight: default_bm25_weight(),
            bm25_config: Bm25Config::default(),
            use_bloom_filter: false,
            bloom_filter_false_positive_rate: default_bloom_fp_rate(),
            match_type_scores: MatchTypeScores::default(),
            scoring_modifiers: HashMap::new(),
        }
    }

    /// Low-latency preset: few strategies, tight thresholds. Resolves the
    /// "two balanced feature sets" open question by keeping `fast` minimal
    /// (exact/prefix/phonetic only, no compound/synonyms).
    pub fn fast() -> Self {
        let mut c = Self::skeleton(PerformanceMode::Fast, 0.4, 1);
        c.features.insert(Capability::Phonetic);
        c.features.insert(Capability::KeyboardNeighbors);
        c
    }

    /// Default preset: the full strategy set at moderate cost.
    pub fn balanced() -> Self {
        let mut c = Self::skeleton(PerformanceMode::Balanced, 0.3, 2);
        for cap in [
            Capability::Phonetic,
            Capability::Compound,
            Capability::Synonyms,
            Capability::KeyboardNeighbors,
            Capability::PartialWords,
        ] {
            c.features.insert(cap);
        }
        c
    }

    /// Maximal-recall preset: wide edit-distance budget, every capability on.
    pub fn comprehensive() -> Self {
        let mut c = Self::skeleton(PerformanceMode::Comprehensive, 0.2, 3);
        for cap in [
            Capability::Phonetic,
            Capability::Compound,
            Capability::Synonyms,
            Capability::KeyboardNeighbors,
            Capability::PartialWords,
            Capability::MissingLetters,
            Capability::ExtraLetters,
            Capability::Transpositions,
        ] {
            c.features.insert(cap);
        }
        c
    }

    /// Validates the configuration, returning `EngineError::Configuration`
    /// describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(EngineError::Configuration(
                "languages must be non-empty (or [\"auto\"])".to_string(),
            ));
        }
        if self.max_results < 1 {
            return Err(EngineError::Configuration(
                "maxResults must be >= 1".to_string(),
            ));
        }
        if self.min_query_length < 1 {
            return Err(EngineError::Configuration(
                "minQueryLength must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(EngineError::Configuration(
                "fuzzyThreshold must be in [0, 1]".to_string(),
            ));
        }
        if self.ngram_size < 2 {
            return Err(EngineError::Configuration(
                "ngramSize must be >= 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bloom_filter_false_positive_rate)
            || self.bloom_filter_false_positive_rate == 0.0
        {
            return Err(EngineError::Configuration(
                "bloomFilterFalsePositiveRate must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bm25_weight) {
            return Err(EngineError::Configuration(
                "bm25Weight must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// True when the language set is the `auto` sentinel.
    pub fn is_auto_language(&self) -> bool {
        self.languages.len() == 1 && self.languages[0] == AUTO_LANGUAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_is_default() {
        assert_eq!(EngineConfig::default().fuzzy_threshold, 0.3);
    }

    #[test]
    fn presets_validate() {
        assert!(EngineConfig::fast().validate().is_ok());
        assert!(EngineConfig::balanced().validate().is_ok());
        assert!(EngineConfig::comprehensive().validate().is_ok());
    }

    #[test]
    fn rejects_bad_threshold() {
        let mut c = EngineConfig::balanced();
        c.fuzzy_threshold = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_empty_languages() {
        let mut c = EngineConfig::balanced();
        c.languages.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_small_ngram() {
        let mut c = EngineConfig::balanced();
        c.ngram_size = 1;
        assert!(c.validate().is_err());
    }
}
