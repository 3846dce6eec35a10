//! The result record (§6): canonical display string, base id, synonym
//! flag, score, matched language, optional highlight spans and field data.

use serde::{Deserialize, Serialize};

use crate::index::MatchType;

/// A `[start, end)` byte-offset span within the matched string, for
/// highlight rendering by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// One ranked result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub display: String,
    pub base_id: String,
    pub is_synonym: bool,
    pub score: f64,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchTypeLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<HighlightSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_field: Option<String>,
    #[serde(default, skip_serializing_if = "ahash::AHashMap::is_empty")]
    pub fields: ahash::AHashMap<String, String>,
}

/// A serializable mirror of [`MatchType`] for result records (the internal
/// enum is not itself serde-derived, since it also drives merge-priority
/// ordinal comparisons via `#[derive(Ord)]`, which would be fragile to
/// couple to a wire format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTypeLabel {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
    Ngram,
    Phonetic,
    Compound,
    Synonym,
    Phrase,
}

impl From<MatchType> for MatchTypeLabel {
    fn from(value: MatchType) -> Self {
        match value {
            MatchType::Exact => MatchTypeLabel::Exact,
            MatchType::Prefix => MatchTypeLabel::Prefix,
            MatchType::Substring => MatchTypeLabel::Substring,
            MatchType::Fuzzy => MatchTypeLabel::Fuzzy,
            MatchType::Ngram => MatchTypeLabel::Ngram,
            MatchType::Phonetic => MatchTypeLabel::Phonetic,
            MatchType::Compound => MatchTypeLabel::Compound,
            MatchType::Synonym => MatchTypeLabel::Synonym,
        }
    }
}
