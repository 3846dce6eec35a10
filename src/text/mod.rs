//! Text-level primitives shared by every language processor and the scorer:
//! bounded edit distance, n-gram similarity, accent folding, alphanumeric
//! segmentation, phrase parsing, and wildcard-query translation.

pub mod accent;
pub mod edit_distance;
pub mod phrase;
pub mod segment;
pub mod wildcard;

pub use accent::AccentNormalizer;
pub use edit_distance::{
    bounded_damerau_levenshtein, bounded_levenshtein, distance_to_similarity, ngram_similarity, EditScratch,
};
pub use phrase::{parse_phrases, ParsedQuery};
pub use segment::{alpha_only, is_mixed_alphanumeric, numeric_only, segment, RunKind, Segment};
pub use wildcard::{compile_wildcard, is_wildcard_query};
