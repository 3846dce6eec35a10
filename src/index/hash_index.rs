//! The small-corpus hash-index path (§4.8): four plain maps in place of
//! the trie/Bloom/BM25 inverted representation, for corpora below ~10k
//! items with no feature requiring the heavier structures.

use ahash::AHashMap;
use std::collections::BTreeSet;

use super::document::DocId;
use super::{Candidate, MatchType};
use crate::text::edit_distance::{bounded_damerau_levenshtein, bounded_levenshtein, ngram_similarity, EditScratch};

/// `variantToBase`, `phoneticToBase`, `ngramIndex`, `synonymMap`: each keyed
/// by a lowercased language-normalized string, valued by the set of
/// canonical doc ids that key resolves to.
#[derive(Debug, Default)]
pub struct HashIndex {
    variant_to_doc: AHashMap<String, BTreeSet<DocId>>,
    phonetic_to_doc: AHashMap<String, BTreeSet<DocId>>,
    ngram_to_doc: AHashMap<String, BTreeSet<DocId>>,
    synonym_to_doc: AHashMap<String, BTreeSet<DocId>>,
}

impl HashIndex {
    pub fn new() -> Self {
        HashIndex::default()
    }

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
        self.variant_to_doc.entry(normalized.to_string()).or_default().insert(doc_id);
        for variant in variants {
            self.variant_to_doc.entry(variant.clone()).or_default().insert(doc_id);
        }
        if let Some(code) = phonetic {
            self.phonetic_to_doc.entry(code.to_string()).or_default().insert(doc_id);
        }
        for synonym in synonyms {
            self.synonym_to_doc.entry(synonym.clone()).or_default().insert(doc_id);
        }
        for gram in ngrams {
            self.ngram_to_doc.entry(gram.clone()).or_default().insert(doc_id);
        }
    }

    /// Rebuilds an index from its four maps, flattened to `(key, doc_ids)`
    /// pairs for snapshotting (§6).
    pub fn from_maps(
        variant: Vec<(String, Vec<DocId>)>,
        phonetic: Vec<(String, Vec<DocId>)>,
        ngram: Vec<(String, Vec<DocId>)>,
        synonym: Vec<(String, Vec<DocId>)>,
    ) -> Self {
        let to_map = |entries: Vec<(String, Vec<DocId>)>| -> AHashMap<String, BTreeSet<DocId>> {
            entries.into_iter().map(|(key, ids)| (key, ids.into_iter().collect())).collect()
        };
        HashIndex {
            variant_to_doc: to_map(variant),
            phonetic_to_doc: to_map(phonetic),
            ngram_to_doc: to_map(ngram),
            synonym_to_doc: to_map(synonym),
        }
    }

    fn entries(map: &AHashMap<String, BTreeSet<DocId>>) -> Vec<(String, Vec<DocId>)> {
        map.iter().map(|(key, ids)| (key.clone(), ids.iter().copied().collect())).collect()
    }

    pub fn variant_entries(&self) -> Vec<(String, Vec<DocId>)> {
        Self::entries(&self.variant_to_doc)
    }

    pub fn phonetic_entries(&self) -> Vec<(String, Vec<DocId>)> {
        Self::entries(&self.phonetic_to_doc)
    }

    pub fn ngram_entries(&self) -> Vec<(String, Vec<DocId>)> {
        Self::entries(&self.ngram_to_doc)
    }

    pub fn synonym_entries(&self) -> Vec<(String, Vec<DocId>)> {
        Self::entries(&self.synonym_to_doc)
    }

    pub fn remove_doc_id(&mut self, doc_id: DocId) {
        for map in [&mut self.variant_to_doc, &mut self.phonetic_to_doc, &mut self.ngram_to_doc, &mut self.synonym_to_doc] {
            map.retain(|_, ids| {
                ids.remove(&doc_id);
                !ids.is_empty()
            });
        }
    }

    fn to_candidates(ids: &BTreeSet<DocId>, match_type: MatchType, key: &str) -> Vec<Candidate> {
        ids.iter()
            .map(|&doc_id| Candidate { doc_id, match_type, matched_key: key.to_string(), distance: None, ngram_similarity: None })
            .collect()
    }

    pub fn exact(&self, query_normalized: &str) -> Vec<Candidate> {
        self.variant_to_doc
            .get(query_normalized)
            .map(|ids| Self::to_candidates(ids, MatchType::Exact, query_normalized))
            .unwrap_or_default()
    }

    /// No trie in this path, so prefix search linearly scans variant keys.
    pub fn prefix(&self, query_normalized: &str) -> Vec<Candidate> {
        self.variant_to_doc
            .iter()
            .filter(|(key, _)| key.starts_with(query_normalized) && key.as_str() != query_normalized)
            .flat_map(|(key, ids)| Self::to_candidates(ids, MatchType::Prefix, key))
            .collect()
    }

    pub fn phonetic(&self, code: &str) -> Vec<Candidate> {
        self.phonetic_to_doc
            .get(code)
            .map(|ids| Self::to_candidates(ids, MatchType::Phonetic, code))
            .unwrap_or_default()
    }

    pub fn synonym(&self, query_normalized: &str) -> Vec<Candidate> {
        self.synonym_to_doc
            .get(query_normalized)
            .map(|ids| Self::to_candidates(ids, MatchType::Synonym, query_normalized))
            .unwrap_or_default()
    }

    pub fn ngram(&self, query_normalized: &str, ngram_size: usize) -> Vec<Candidate> {
        let grams = crate::text::edit_distance::char_ngrams(query_normalized, ngram_size);
        let mut candidates = Vec::new();
        for gram in &grams {
            if let Some(ids) = self.ngram_to_doc.get(gram) {
                for &doc_id in ids {
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

    /// Fuzzy search scans every variant key (§4.8: no trie-backed
    /// prefix-filtering available here).
    pub fn fuzzy(&self, query_normalized: &str, max_edit_distance: u32, use_damerau: bool) -> Vec<Candidate> {
        let ceiling = if query_normalized.chars().count() <= 3 {
            max_edit_distance.max(2)
        } else {
            max_edit_distance
        };
        let mut scratch = EditScratch::default();
        let mut candidates = Vec::new();
        for (key, ids) in &self.variant_to_doc {
            let len_diff = (key.chars().count() as i64 - query_normalized.chars().count() as i64).unsigned_abs();
            if len_diff as u32 > ceiling {
                continue;
            }
            let distance = if use_damerau {
                bounded_damerau_levenshtein(query_normalized, key, ceiling, &mut scratch)
            } else {
                bounded_levenshtein(query_normalized, key, ceiling, &mut scratch)
            };
            if distance > ceiling {
                continue;
            }
            for &doc_id in ids {
                candidates.push(Candidate {
                    doc_id,
                    match_type: MatchType::Fuzzy,
                    matched_key: key.clone(),
                    distance: Some(distance),
                    ngram_similarity: None,
                });
            }
        }
        candidates
    }
}
