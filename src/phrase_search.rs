//! The phrase search driver (§4.11): exact substring → per-word fuzzy
//! alignment → proximity match, with a bonus multiplier, combined with
//! ordinary term matches.

use crate::text::edit_distance::{bounded_levenshtein, EditScratch};

const PROXIMITY_BONUS: f64 = 1.5;
const PROXIMITY_WINDOW: usize = 3;
const PHRASE_TERM_BOOST: f64 = 1.2;
const TERM_ONLY_DEMOTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseMatchKind {
    ExactSubstring,
    WordAligned,
    Proximity,
}

#[derive(Debug, Clone)]
pub struct PhraseMatch {
    pub kind: PhraseMatchKind,
    pub score: f64,
}

/// Tries, in order: exact substring containment, per-word fuzzy alignment
/// (at most one edit per word), then a bounded-window proximity match.
/// Returns `None` if none apply.
pub fn match_phrase(phrase: &str, haystack_normalized: &str) -> Option<PhraseMatch> {
    if haystack_normalized.contains(phrase) {
        return Some(PhraseMatch { kind: PhraseMatchKind::ExactSubstring, score: 1.0 });
    }

    let phrase_words: Vec<&str> = phrase.split_whitespace().collect();
    let haystack_words: Vec<&str> = haystack_normalized.split_whitespace().collect();
    if phrase_words.is_empty() {
        return None;
    }

    if let Some(score) = word_aligned_score(&phrase_words, &haystack_words) {
        return Some(PhraseMatch { kind: PhraseMatchKind::WordAligned, score });
    }

    if let Some(score) = proximity_score(&phrase_words, &haystack_words) {
        return Some(PhraseMatch { kind: PhraseMatchKind::Proximity, score: score * PROXIMITY_BONUS });
    }

    None
}

/// Looks for a contiguous run in `haystack_words` the same length as
/// `phrase_words` where every word is within edit distance 1.
fn word_aligned_score(phrase_words: &[&str], haystack_words: &[&str]) -> Option<f64> {
    if haystack_words.len() < phrase_words.len() {
        return None;
    }
    let mut scratch = EditScratch::default();
    for window in haystack_words.windows(phrase_words.len()) {
        let aligned = phrase_words.iter().zip(window.iter()).all(|(&pw, &hw)| {
            let ceiling = 1;
            bounded_levenshtein(pw, hw, ceiling, &mut scratch) <= ceiling
        });
        if aligned {
            return Some(0.9);
        }
    }
    None
}

/// `true`-returning score when every phrase word appears somewhere in
/// `haystack_words` within a bounded window of each other, in any order.
fn proximity_score(phrase_words: &[&str], haystack_words: &[&str]) -> Option<f64> {
    let mut positions = Vec::with_capacity(phrase_words.len());
    for &word in phrase_words {
        let pos = haystack_words.iter().position(|&hw| hw == word)?;
        positions.push(pos);
    }
    positions.sort_unstable();
    let span = positions.last()? - positions.first()?;
    if span <= PROXIMITY_WINDOW + phrase_words.len() {
        let tightness = 1.0 - (span as f64 / (PROXIMITY_WINDOW + phrase_words.len()) as f64) * 0.4;
        Some(tightness.clamp(0.5, 1.0))
    } else {
        None
    }
}

/// Combines a phrase match (if any) with an ordinary term-pipeline score
/// for the same candidate: both present boosts 1.2x, term-only demotes
/// 0.8x, phrase-only keeps its own score.
pub fn combine_phrase_and_term_scores(phrase_score: Option<f64>, term_score: Option<f64>) -> f64 {
    match (phrase_score, term_score) {
        (Some(p), Some(t)) => (p.max(t) * PHRASE_TERM_BOOST).min(1.0),
        (Some(p), None) => p,
        (None, Some(t)) => (t * TERM_ONLY_DEMOTION).min(1.0),
        (None, None) => 0.0,
    }
}
