//! Diacritic folding with a bounded LRU memoization cache.
//!
//! Two-stage, per §4.2: a direct table for precomposed Latin-1/Latin-Extended
//! letters and ligatures that Unicode canonical decomposition can't reach on
//! its own (`æ`, `œ`, `ß`, `þ`, ...), then canonical (NFD) decomposition with
//! combining marks (U+0300–U+036F) stripped for everything else.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use unicode_normalization::UnicodeNormalization;

fn direct_fold(c: char) -> Option<&'static str> {
    Some(match c {
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ß' => "ss",
        'þ' => "th",
        'Þ' => "Th",
        'ð' | 'Ð' => "d",
        'ø' | 'Ø' => "o",
        'ł' | 'Ł' => "l",
        'đ' | 'Đ' => "d",
        _ => return None,
    })
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Pure, uncached diacritic-folding transform.
pub fn strip_accents(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for c in input.chars() {
        match direct_fold(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }
    folded.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Memoizes [`strip_accents`] behind a bounded LRU keyed by the exact input
/// string. Thread-safe: a single normalizer can be shared across an index
/// and all of its language processors.
#[derive(Debug)]
pub struct AccentNormalizer {
    cache: Mutex<LruCache<String, String>>,
}

impl AccentNormalizer {
    pub fn new(capacity: usize) -> Self {
        AccentNormalizer {
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap())),
        }
    }

    pub fn normalize(&self, input: &str) -> String {
        let mut cache = self.cache.lock().expect("accent cache poisoned");
        if let Some(hit) = cache.get(input) {
            return hit.clone();
        }
        let result = strip_accents(input);
        cache.put(input.to_string(), result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.cache.lock().expect("accent cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AccentNormalizer {
    fn default() -> Self {
        AccentNormalizer::new(2048)
    }
}
