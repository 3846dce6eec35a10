//! Posting lists (§3): for a key T, the sorted/deduplicated list of
//! document ids containing T. The inverted index owns four independent
//! tables: `term→postings`, `phonetic→postings`, `ngram→postings`,
//! `synonym→postings`.

use ahash::AHashMap;
use std::collections::BTreeSet;

use super::document::DocId;

/// A single key's posting list, kept sorted and deduplicated via a
/// `BTreeSet`.
#[derive(Debug, Clone, Default)]
pub struct PostingList(BTreeSet<DocId>);

impl PostingList {
    pub fn insert(&mut self, doc_id: DocId) {
        self.0.insert(doc_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<DocId> {
        self.0.iter().copied().collect()
    }
}

/// A key→posting-list table, e.g. `term→postings`.
#[derive(Debug, Clone, Default)]
pub struct PostingTable {
    entries: AHashMap<String, PostingList>,
}

impl PostingTable {
    pub fn new() -> Self {
        PostingTable::default()
    }

    pub fn insert(&mut self, key: &str, doc_id: DocId) {
        self.entries.entry(key.to_string()).or_default().insert(doc_id);
    }

    pub fn get(&self, key: &str) -> Option<&PostingList> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Document frequency of `key`: the size of its posting list, or 0.
    pub fn doc_frequency(&self, key: &str) -> usize {
        self.entries.get(key).map(PostingList::len).unwrap_or(0)
    }

    /// Every `(key, doc_ids)` pair, for snapshotting (§6).
    pub fn entries(&self) -> Vec<(String, Vec<DocId>)> {
        self.entries.iter().map(|(key, list)| (key.clone(), list.to_vec())).collect()
    }

    /// Rebuilds a table from snapshot entries.
    pub fn from_entries(entries: Vec<(String, Vec<DocId>)>) -> Self {
        let mut table = PostingTable::new();
        for (key, doc_ids) in entries {
            for doc_id in doc_ids {
                table.insert(&key, doc_id);
            }
        }
        table
    }

    /// Rebuilds the table in place, dropping doc ids for which `keep`
    /// returns `false` and removing keys left with an empty posting list.
    /// Used by removal (§4.14), which rebuilds posting tables wholesale
    /// rather than patching them incrementally.
    pub fn retain_doc_ids(&mut self, keep: impl Fn(DocId) -> bool) {
        for list in self.entries.values_mut() {
            list.0.retain(|id| keep(*id));
        }
        self.entries.retain(|_, list| !list.is_empty());
    }
}
