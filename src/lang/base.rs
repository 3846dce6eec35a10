//! Default Language Processor: sensible fallbacks (QWERTY neighbors, a
//! simple soundex-like phonetic code, generic affix/prefix variant
//! generation) that concrete processors can override piecemeal.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::{Capability, LanguageProcessor, PerformanceMode};

/// QWERTY physical-adjacency rows, used to answer `is_valid_substitution`.
static QWERTY_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];

static QWERTY_NEIGHBORS: Lazy<HashMap<char, HashSet<char>>> = Lazy::new(|| {
    let mut map: HashMap<char, HashSet<char>> = HashMap::new();
    for (row_idx, row) in QWERTY_ROWS.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            let entry = map.entry(c).or_default();
            if i > 0 {
                entry.insert(chars[i - 1]);
            }
            if i + 1 < chars.len() {
                entry.insert(chars[i + 1]);
            }
            // Adjacent keyboard rows are offset by roughly half a key; treat
            // same-index and neighboring-index characters on the row above
            // as adjacent too.
            if row_idx > 0 {
                let above: Vec<char> = QWERTY_ROWS[row_idx - 1].chars().collect();
                for offset in [0usize, 1] {
                    if let Some(idx) = i.checked_sub(offset) {
                        if let Some(&ac) = above.get(idx) {
                            entry.insert(ac);
                        }
                    }
                }
            }
        }
    }
    map
});

/// A base implementation supplying the defaults every processor inherits
/// unless it overrides a piece: QWERTY keyboard neighbors, a soundex-like
/// phonetic code, and generic prefix-based variant generation.
#[derive(Debug, Clone)]
pub struct BaseLanguageProcessor {
    tag: String,
    display_name: String,
    capabilities: HashSet<Capability>,
}

impl BaseLanguageProcessor {
    pub fn new(tag: impl Into<String>, display_name: impl Into<String>, capabilities: HashSet<Capability>) -> Self {
        BaseLanguageProcessor {
            tag: tag.into(),
            display_name: display_name.into(),
            capabilities,
        }
    }

    /// American-Soundex-style phonetic code: keep the first letter, map the
    /// rest to digit classes, collapse adjacent duplicates, pad/truncate to
    /// 4 characters. Deterministic and case/accent independent provided the
    /// caller passes an already-folded word.
    pub fn soundex(word: &str) -> Option<String> {
        let word: Vec<char> = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        let first = *word.first()?;

        fn class(c: char) -> u8 {
            match c.to_ascii_lowercase() {
                'b' | 'f' | 'p' | 'v' => 1,
                'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => 2,
                'd' | 't' => 3,
                'l' => 4,
                'm' | 'n' => 5,
                'r' => 6,
                _ => 0,
            }
        }

        let mut code = String::new();
        code.push(first.to_ascii_uppercase());
        let mut last_class = class(first);
        for &c in &word[1..] {
            let cls = class(c);
            if cls != 0 && cls != last_class {
                code.push((b'0' + cls) as char);
            }
            if cls != 0 || !matches!(c.to_ascii_lowercase(), 'h' | 'w') {
                last_class = cls;
            }
            if code.len() == 4 {
                break;
            }
        }
        while code.len() < 4 {
            code.push('0');
        }
        Some(code)
    }

    /// Generic prefix + affix-stripped variant generation, scaled by
    /// performance mode: fast mode emits a couple of short prefixes,
    /// balanced steps adaptively, comprehensive emits near-exhaustive
    /// prefixes up to a bounded count.
    pub fn generic_word_variants(word: &str, performance: PerformanceMode) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();
        if len < 2 {
            return vec![word.to_string()];
        }

        let prefix_lengths: Vec<usize> = match performance {
            PerformanceMode::Fast => {
                let mut v = Vec::new();
                if len > 3 {
                    v.push(3);
                }
                if len > 5 {
                    v.push(5);
                }
                v
            }
            PerformanceMode::Balanced => {
                let step = 2;
                (step..len).step_by(step).take(6).collect()
            }
            PerformanceMode::Comprehensive => (2..len).take(12).collect(),
        };

        let mut variants: Vec<String> = vec![word.to_string()];
        for plen in prefix_lengths {
            variants.push(chars[..plen].iter().collect());
        }
        // Simple suffix-stripped affix variant (drop a trailing 's', 'es', 'ing', 'ed').
        for suffix in ["ing", "ed", "es", "s"] {
            if let Some(stripped) = word.strip_suffix(suffix) {
                if stripped.len() >= 2 {
                    variants.push(stripped.to_string());
                }
            }
        }
        variants.sort();
        variants.dedup();
        variants
    }
}

impl LanguageProcessor for BaseLanguageProcessor {
    fn language_tag(&self) -> &str {
        &self.tag
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn capabilities(&self) -> &HashSet<Capability> {
        &self.capabilities
    }

    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        lowered.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn phonetic_code(&self, word: &str) -> Option<String> {
        if !self.has_capability(Capability::Phonetic) {
            return None;
        }
        Self::soundex(word)
    }

    fn word_variants(&self, word: &str, performance: PerformanceMode) -> Vec<String> {
        Self::generic_word_variants(word, performance)
    }

    fn is_valid_substitution(&self, a: char, b: char) -> bool {
        if !self.has_capability(Capability::KeyboardNeighbors) {
            return false;
        }
        QWERTY_NEIGHBORS
            .get(&a.to_ascii_lowercase())
            .map(|neighbors| neighbors.contains(&b.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soundex_groups_similar_sounding_words() {
        assert_eq!(BaseLanguageProcessor::soundex("Robert"), BaseLanguageProcessor::soundex("Rupert"));
        assert_eq!(BaseLanguageProcessor::soundex("Ashcraft").unwrap().len(), 4);
    }

    #[test]
    fn soundex_is_deterministic() {
        let a = BaseLanguageProcessor::soundex("apple");
        let b = BaseLanguageProcessor::soundex("apple");
        assert_eq!(a, b);
    }

    #[test]
    fn qwerty_neighbors_are_adjacent_keys() {
        let caps: HashSet<Capability> = [Capability::KeyboardNeighbors].into_iter().collect();
        let proc = BaseLanguageProcessor::new("base", "Base", caps);
        assert!(proc.is_valid_substitution('q', 'w'));
        assert!(!proc.is_valid_substitution('q', 'p'));
    }

    #[test]
    fn variant_count_scales_with_performance_mode() {
        let fast = BaseLanguageProcessor::generic_word_variants("internationalization", PerformanceMode::Fast);
        let comprehensive =
            BaseLanguageProcessor::generic_word_variants("internationalization", PerformanceMode::Comprehensive);
        assert!(comprehensive.len() >= fast.len());
    }
}
