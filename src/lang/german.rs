//! German [`LanguageProcessor`]: umlaut/ß folding and compound-word
//! decomposition against a small built-in vocabulary, via the `decompound`
//! crate.

use std::collections::HashSet;

use decompound::{decompound, DecompositionOptions};
use once_cell::sync::Lazy;

use super::base::BaseLanguageProcessor;
use super::{Capability, LanguageProcessor, PerformanceMode};

/// A small seed vocabulary of German word stems used to validate compound
/// splits. Real deployments supply a much larger list via configuration;
/// this covers the scenarios the engine is expected to handle out of the box.
static VOCABULARY: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "kranken", "haus", "apotheke", "arzt", "pflege", "wasser", "kraft", "werk", "fahrt",
        "zeug", "schule", "buch", "kind", "garten", "auto", "bahn", "hof", "zimmer", "tisch",
        "stadt", "land", "zentrum",
    ]
    .into_iter()
    .collect()
});

fn is_valid_word(word: &str) -> bool {
    VOCABULARY.contains(word.to_lowercase().as_str())
}

/// Folds German umlauts and eszett onto their standard ASCII expansions:
/// `ä -> ae`, `ö -> oe`, `ü -> ue`, `ß -> ss`.
pub fn fold_umlauts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ä' | 'Ä' => out.push_str("ae"),
            'ö' | 'Ö' => out.push_str("oe"),
            'ü' | 'Ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct GermanProcessor {
    base: BaseLanguageProcessor,
}

impl GermanProcessor {
    pub fn new() -> Self {
        let capabilities: HashSet<Capability> = [
            Capability::Compound,
            Capability::KeyboardNeighbors,
            Capability::PartialWords,
            Capability::MissingLetters,
            Capability::ExtraLetters,
            Capability::Transpositions,
        ]
        .into_iter()
        .collect();
        GermanProcessor {
            base: BaseLanguageProcessor::new("german", "German", capabilities),
        }
    }
}

impl Default for GermanProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageProcessor for GermanProcessor {
    fn language_tag(&self) -> &str {
        self.base.language_tag()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn capabilities(&self) -> &HashSet<Capability> {
        self.base.capabilities()
    }

    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let folded = fold_umlauts(&lowered);
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn split_compound_words(&self, word: &str) -> Vec<String> {
        if !self.has_capability(Capability::Compound) {
            return vec![word.to_string()];
        }
        let lower = word.to_lowercase();
        match decompound(&lower, &is_valid_word, DecompositionOptions::empty()) {
            Ok(parts) if parts.len() > 1 => parts,
            _ => vec![lower],
        }
    }

    fn word_variants(&self, word: &str, performance: PerformanceMode) -> Vec<String> {
        let mut variants = self.base.word_variants(word, performance);
        let parts = self.split_compound_words(word);
        if parts.len() > 1 {
            variants.extend(parts);
        }
        variants.sort();
        variants.dedup();
        variants
    }

    fn is_valid_substitution(&self, a: char, b: char) -> bool {
        self.base.is_valid_substitution(a, b)
    }
}
