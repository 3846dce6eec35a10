//! The inverted index (§4.7): four independent posting tables, a prefix
//! trie, an optional Bloom filter, and optional BM25 statistics, plus the
//! per-strategy search methods the orchestrator fans out to.

use super::bloom::BloomFilter;
use super::bm25::Bm25Stats;
use super::document::{DocId, DocumentStore};
use super::postings::PostingTable;
use super::trie::Trie;
use super::{Candidate, MatchType};
use crate::text::edit_distance::{bounded_damerau_levenshtein, bounded_levenshtein, ngram_similarity, EditScratch};

/// Above this many terms, fuzzy search prefix-filters candidates through
/// the trie instead of scanning every term (§4.7).
const LARGE_TERM_POPULATION: usize = 50_000;

/// Candidate cap for fuzzy scanning on large corpora vs. small ones (§4.7).
const LARGE_CORPUS_FUZZY_CAP: usize = 1_000;
const SMALL_CORPUS_FUZZY_CAP: usize = 8_000;

/// Posting tables, trie, optional Bloom filter, and optional BM25 stats.
/// Owns no documents itself; the engine's single [`DocumentStore`] is
/// shared across whichever index backend is active.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub term_postings: PostingTable,
    pub phonetic_postings: PostingTable,
    pub ngram_postings: PostingTable,
    pub synonym_postings: PostingTable,
    pub trie: Trie,
    pub bloom: Option<BloomFilter>,
    pub bm25: Option<Bm25Stats>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Rebuilds an index from its four posting tables (§6 snapshot
    /// restore): the trie is re-derived from `term_postings` since it is
    /// otherwise fully determined by it. Bloom/BM25 are restored
    /// separately by the caller.
    pub fn from_postings(
        term_postings: PostingTable,
        phonetic_postings: PostingTable,
        ngram_postings: PostingTable,
        synonym_postings: PostingTable,
    ) -> Self {
        let mut trie = Trie::new();
        for key in term_postings.keys() {
            if let Some(list) = term_postings.get(key) {
                trie.insert(key, list.iter());
            }
        }
        InvertedIndex {
            term_postings,
            phonetic_postings,
            ngram_postings,
            synonym_postings,
            trie,
            bloom: None,
            bm25: None,
        }
    }

    /// Indexes one already-processed document: its own normalized form,
    /// every variant (prefix/affix/accent-free/compound part), its
    /// phonetic code, its synonyms, and its n-grams.
    #[allow(clippy::too_many_arguments)]
    pub fn index_document(
        &mut self,
        doc_id: DocId,
        normalized: &str,
        variants: &[String],
        phonetic: Option<&str>,
        synonyms: &[String],
        ngrams: &[String],
    ) {
        self.term_postings.insert(normalized, doc_id);
        self.trie.insert(normalized, [doc_id]);
        for variant in variants {
            self.term_postings.insert(variant, doc_id);
            self.trie.insert(variant, [doc_id]);
        }
        if let Some(code) = phonetic {
            self.phonetic_postings.insert(code, doc_id);
        }
        for synonym in synonyms {
            self.synonym_postings.insert(synonym, doc_id);
        }
        for gram in ngrams {
            self.ngram_postings.insert(gram, doc_id);
        }
    }

    /// Rebuilds the Bloom filter over the current `term→postings` key set.
    pub fn rebuild_bloom(&mut self, false_positive_rate: f64) {
        let terms: Vec<&String> = self.term_postings.keys().collect();
        let mut filter = BloomFilter::new(terms.len().max(1), false_positive_rate);
        for term in terms {
            filter.add(term);
        }
        self.bloom = Some(filter);
    }

    /// Recomputes BM25 statistics from the live document store.
    pub fn rebuild_bm25(&mut self, documents: &DocumentStore) {
        let lengths: Vec<(DocId, usize)> = documents
            .iter_live()
            .map(|doc| (doc.id, doc.normalized.split_whitespace().count().max(1)))
            .collect();
        self.bm25 = Some(Bm25Stats::build(lengths));
    }

    /// §4.7 step 1: Bloom-check first; skip the lookup entirely if absent.
    pub fn exact(&self, query_normalized: &str) -> Vec<Candidate> {
        if let Some(bloom) = &self.bloom {
            if !bloom.might_contain(query_normalized) {
                return Vec::new();
            }
        }
        self.term_postings
            .get(query_normalized)
            .map(|postings| {
                postings
                    .iter()
                    .map(|doc_id| Candidate {
                        doc_id,
                        match_type: MatchType::Exact,
                        matched_key: query_normalized.to_string(),
                        distance: None,
                        ngram_similarity: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// §4.7 step 2: trie prefix enumeration, excluding the exact-match term.
    pub fn prefix(&self, query_normalized: &str) -> Vec<Candidate> {
        self.trie
            .find_with_prefix(query_normalized)
            .into_iter()
            .filter(|(term, _)| term != query_normalized)
            .flat_map(|(term, doc_ids)| {
                doc_ids.into_iter().map(move |doc_id| Candidate {
                    doc_id,
                    match_type: MatchType::Prefix,
                    matched_key: term.clone(),
                    distance: None,
                    ngram_similarity: None,
                })
            })
            .collect()
    }

    /// §4.7 step 3: phonetic-code lookup.
    pub fn phonetic(&self, code: &str) -> Vec<Candidate> {
        self.phonetic_postings
            .get(code)
            .map(|postings| {
                postings
                    .iter()
                    .map(|doc_id| Candidate {
                        doc_id,
                        match_type: MatchType::Phonetic,
                        matched_key: code.to_string(),
                        distance: None,
                        ngram_similarity: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// §4.7 step 4: synonym-table lookup.
    pub fn synonym(&self, query_normalized: &str) -> Vec<Candidate> {
        self.synonym_postings
            .get(query_normalized)
            .map(|postings| {
                postings
                    .iter()
                    .map(|doc_id| Candidate {
                        doc_id,
                        match_type: MatchType::Synonym,
                        matched_key: query_normalized.to_string(),
                        distance: None,
                        ngram_similarity: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// §4.7 step 5: union the posting lists of every n-gram of the query.
    pub fn ngram(&self, query_normalized: &str, ngram_size: usize) -> Vec<Candidate> {
        let grams = crate::text::edit_distance::char_ngrams(query_normalized, ngram_size);
        let mut candidates = Vec::new();
        for gram in &grams {
            if let Some(postings) = self.ngram_postings.get(gram) {
                for doc_id in postings.iter() {
                    candidates.push(Candidate {
                        doc_id,
                        match_type: MatchType::Ngram,
                        matched_key: gram.clone(),
                        distance: None,
                        ngram_similarity: Some(ngram_similarity(query_normalized, gram, ngram_size)),
                    });
                }
            }
        }
        candidates
    }

    /// §4.7 step 6: bounded fuzzy matching over the term population, with
    /// prefix-filtering and candidate caps for large corpora.
    pub fn fuzzy(&self, query_normalized: &str, max_edit_distance: u32, use_damerau: bool) -> Vec<Candidate> {
        let ceiling = if query_normalized.chars().count() <= 3 {
            max_edit_distance.max(2)
        } else {
            max_edit_distance
        };

        let term_population = self.term_postings.len();
        let mut candidate_terms: Vec<String> = if term_population > LARGE_TERM_POPULATION {
            let prefix_len = query_normalized.chars().count().clamp(1, 3);
            let prefix: String = query_normalized.chars().take(prefix_len).collect();
            let prefiltered = self.trie.find_with_prefix(&prefix);
            if prefiltered.len() >= 100 {
                prefiltered.into_iter().map(|(term, _)| term).collect()
            } else {
                self.term_postings.keys().cloned().collect()
            }
        } else {
            self.term_postings.keys().cloned().collect()
        };

        candidate_terms.sort_by_key(|term| {
            (term.chars().count() as i64 - query_normalized.chars().count() as i64).unsigned_abs()
        });

        let cap = if term_population > 100_000 {
            LARGE_CORPUS_FUZZY_CAP
        } else {
            SMALL_CORPUS_FUZZY_CAP
        };

        let mut scratch = EditScratch::default();
        let mut candidates = Vec::new();
        for term in candidate_terms.into_iter().take(cap) {
            let len_diff = (term.chars().count() as i64 - query_normalized.chars().count() as i64).unsigned_abs();
            if len_diff as u32 > ceiling {
                continue;
            }
            let first_char_gap = first_char_code_distance(query_normalized, &term);
            if first_char_gap > 50 && ceiling < 2 {
                continue;
            }
            let distance = if use_damerau {
                bounded_damerau_levenshtein(query_normalized, &term, ceiling, &mut scratch)
            } else {
                bounded_levenshtein(query_normalized, &term, ceiling, &mut scratch)
            };
            if distance > ceiling {
                continue;
            }
            if let Some(postings) = self.term_postings.get(&term) {
                for doc_id in postings.iter() {
                    candidates.push(Candidate {
                        doc_id,
                        match_type: MatchType::Fuzzy,
                        matched_key: term.clone(),
                        distance: Some(distance),
                        ngram_similarity: None,
                    });
                }
            }
        }
        candidates
    }

    /// Removes `doc_id` from every posting table and the trie. Used by
    /// `remove` (§4.14), which always rebuilds secondary structures.
    pub fn remove_doc_id(&mut self, doc_id: DocId) {
        let keep = |id: DocId| id != doc_id;
        self.term_postings.retain_doc_ids(keep);
        self.phonetic_postings.retain_doc_ids(keep);
        self.ngram_postings.retain_doc_ids(keep);
        self.synonym_postings.retain_doc_ids(keep);
        self.trie.retain_doc_ids(keep);
    }
}

fn first_char_code_distance(a: &str, b: &str) -> u32 {
    match (a.chars().next(), b.chars().next()) {
        (Some(ca), Some(cb)) => (ca as i64 - cb as i64).unsigned_abs() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> InvertedIndex {
        let mut documents = DocumentStore::new();
        let mut index = InvertedIndex::new();
        let words = ["apple", "apricot", "banana"];
        for (i, word) in words.iter().enumerate() {
            let id =
                documents.insert(word.to_string(), word.to_string(), word.to_string(), None, "english".into(), vec![]);
            assert_eq!(id as usize, i);
            index.index_document(id, word, &[], None, &[], &[]);
        }
        index
    }

    #[test]
    fn exact_lookup_returns_matching_document() {
        let index = sample_index();
        let candidates = index.exact("apple");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].match_type, MatchType::Exact);
    }

    #[test]
    fn prefix_lookup_excludes_exact_term() {
        let index = sample_index();
        let candidates = index.prefix("ap");
        let terms: Vec<&str> = candidates.iter().map(|c| c.matched_key.as_str()).collect();
        assert!(terms.contains(&"apple"));
        assert!(terms.contains(&"apricot"));
    }

    #[test]
    fn fuzzy_finds_close_typo() {
        let index = sample_index();
        let candidates = index.fuzzy("aple", 2, false);
        assert!(candidates.iter().any(|c| c.matched_key == "apple"));
    }

    #[test]
    fn bloom_short_circuits_absent_exact_lookup() {
        let mut index = sample_index();
        index.rebuild_bloom(0.01);
        assert!(index.exact("grapefruit").is_empty());
    }

    #[test]
    fn remove_doc_id_clears_postings_and_trie() {
        let mut index = sample_index();
        index.remove_doc_id(0);
        assert!(index.exact("apple").is_empty());
        assert!(index.trie.get("apple").is_none());
    }
}
