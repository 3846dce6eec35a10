//! English [`LanguageProcessor`]: Porter stemming via `rust-stemmers`,
//! a static stop-word list, keyboard-neighbor and phonetic capabilities
//! inherited from [`BaseLanguageProcessor`].

use std::collections::HashSet;
use std::sync::OnceLock;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

use super::base::BaseLanguageProcessor;
use super::{Capability, LanguageProcessor, PerformanceMode};

fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "could", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "itself", "let's", "me", "more", "most", "my", "myself", "no", "nor", "not", "of",
        "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out",
        "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
        "what", "when", "where", "which", "while", "who", "whom", "why", "with", "would", "you",
        "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// `true` when `word` (already lowercased) is a common English stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[derive(Debug, Clone)]
pub struct EnglishProcessor {
    base: BaseLanguageProcessor,
}

impl EnglishProcessor {
    pub fn new() -> Self {
        let capabilities: HashSet<Capability> = [
            Capability::Phonetic,
            Capability::KeyboardNeighbors,
            Capability::PartialWords,
            Capability::MissingLetters,
            Capability::ExtraLetters,
            Capability::Transpositions,
        ]
        .into_iter()
        .collect();
        EnglishProcessor {
            base: BaseLanguageProcessor::new("english", "English", capabilities),
        }
    }

    pub fn stem(word: &str) -> String {
        stemmer().stem(word).to_string()
    }
}

impl Default for EnglishProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageProcessor for EnglishProcessor {
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
        self.base.normalize(text)
    }

    fn phonetic_code(&self, word: &str) -> Option<String> {
        self.base.phonetic_code(word)
    }

    fn word_variants(&self, word: &str, performance: PerformanceMode) -> Vec<String> {
        let mut variants = self.base.word_variants(word, performance);
        let stemmed = Self::stem(word);
        if stemmed != word {
            variants.push(stemmed);
        }
        variants.sort();
        variants.dedup();
        variants
    }

    fn is_valid_substitution(&self, a: char, b: char) -> bool {
        self.base.is_valid_substitution(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_common_plurals() {
        assert_eq!(EnglishProcessor::stem("running"), "run");
        assert_eq!(EnglishProcessor::stem("flies"), "fli");
    }

    #[test]
    fn stop_word_list_contains_common_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("and"));
        assert!(!is_stop_word("pizza"));
    }

    #[test]
    fn word_variants_include_stem() {
        let proc = EnglishProcessor::new();
        let variants = proc.word_variants("running", PerformanceMode::Balanced);
        assert!(variants.contains(&"run".to_string()));
    }

    #[test]
    fn declares_phonetic_and_keyboard_capabilities() {
        let proc = EnglishProcessor::new();
        assert!(proc.has_capability(Capability::Phonetic));
        assert!(proc.has_capability(Capability::KeyboardNeighbors));
        assert!(proc.phonetic_code("robert").is_some());
    }
}
