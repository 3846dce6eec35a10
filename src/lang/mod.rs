//! The Language Processor capability interface (§4.4). The engine depends
//! only on this trait; it does not own synonym lists, keyboard layouts, or
//! phonetic-algorithm constants for any particular language — those are a
//! processor's responsibility to supply.

pub mod base;
pub mod english;
pub mod german;
pub mod registry;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use crate::config::PerformanceMode;
pub use base::BaseLanguageProcessor;
pub use english::EnglishProcessor;
pub use german::GermanProcessor;
pub use registry::ProcessorRegistry;

/// A capability a [`LanguageProcessor`] may declare. The set is closed and
/// known at build time, per the design's "capability polymorphism" note —
/// no open inheritance, just a fixed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Phonetic,
    Compound,
    Synonyms,
    KeyboardNeighbors,
    PartialWords,
    MissingLetters,
    ExtraLetters,
    Transpositions,
}

/// Per-language normalization, phonetic coding, compound splitting,
/// word-variant expansion, synonym lookup, and keyboard-neighbor adjacency.
pub trait LanguageProcessor: Send + Sync {
    /// BCP-47-ish language tag, e.g. `"english"`, `"german"`.
    fn language_tag(&self) -> &str;

    /// Human-readable display name.
    fn name(&self) -> &str;

    /// The capability set this processor declares.
    fn capabilities(&self) -> &HashSet<Capability>;

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Lowercasing, whitespace collapse, and language-specific folding
    /// (e.g. German `ä -> ae`, `ß -> ss`).
    fn normalize(&self, text: &str) -> String;

    /// A deterministic per-language phonetic fingerprint, independent of
    /// input case or accents. `None` if the processor lacks `Phonetic`.
    fn phonetic_code(&self, word: &str) -> Option<String> {
        let _ = word;
        None
    }

    /// Language-specific compound decomposition. Defaults to `[word]`.
    fn split_compound_words(&self, word: &str) -> Vec<String> {
        vec![word.to_string()]
    }

    /// Morphological/affix variants plus prefixes, scaled by performance mode.
    fn word_variants(&self, word: &str, performance: PerformanceMode) -> Vec<String>;

    /// Fixed or configured synonyms for `word`.
    fn synonyms(&self, word: &str) -> Vec<String> {
        let _ = word;
        Vec::new()
    }

    /// Keyboard-neighbor adjacency on this language's layout.
    fn is_valid_substitution(&self, a: char, b: char) -> bool {
        let _ = (a, b);
        false
    }
}
