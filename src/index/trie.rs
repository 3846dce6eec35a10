//! Radix-free character trie (§4.5): exact lookup and prefix enumeration
//! over the terms indexed in the inverted index.

use ahash::AHashMap;
use std::collections::BTreeSet;

use super::document::DocId;

#[derive(Debug, Default)]
struct TrieNode {
    children: AHashMap<char, TrieNode>,
    doc_ids: BTreeSet<DocId>,
    is_terminal: bool,
}

/// Maps term strings to the set of document ids indexed under that term,
/// supporting exact lookup and prefix enumeration.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    term_count: usize,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    /// Inserts `term`, unioning `doc_ids` into whatever is already stored
    /// at the terminal node.
    pub fn insert(&mut self, term: &str, doc_ids: impl IntoIterator<Item = DocId>) {
        let mut node = &mut self.root;
        for c in term.chars() {
            node = node.children.entry(c).or_default();
        }
        if !node.is_terminal {
            self.term_count += 1;
        }
        node.is_terminal = true;
        node.doc_ids.extend(doc_ids);
    }

    /// Exact lookup: the doc-id set stored at `term`'s terminal node, if any.
    pub fn get(&self, term: &str) -> Option<&BTreeSet<DocId>> {
        let node = self.descend(term)?;
        node.is_terminal.then_some(&node.doc_ids)
    }

    /// Every `(term, doc_ids)` pair whose term starts with `prefix`,
    /// gathered by descending to `prefix`'s node then DFS-ing below it.
    pub fn find_with_prefix(&self, prefix: &str) -> Vec<(String, Vec<DocId>)> {
        let Some(start) = self.descend(prefix) else {
            return Vec::new();
        };
        let mut results = Vec::new();
        let mut buf = prefix.to_string();
        Self::collect(start, &mut buf, &mut results);
        results
    }

    fn collect(node: &TrieNode, buf: &mut String, out: &mut Vec<(String, Vec<DocId>)>) {
        if node.is_terminal {
            out.push((buf.clone(), node.doc_ids.iter().copied().collect()));
        }
        for (&c, child) in &node.children {
            buf.push(c);
            Self::collect(child, buf, out);
            buf.pop();
        }
    }

    fn descend(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Removes `doc_id` from every posting in the subtree, pruning any
    /// terminal that becomes empty. Used by a full posting-table rebuild
    /// rather than called per-removal; see the builder.
    pub fn retain_doc_ids(&mut self, keep: impl Fn(DocId) -> bool + Copy) {
        Self::retain_node(&mut self.root, keep, &mut self.term_count);
    }

    fn retain_node(node: &mut TrieNode, keep: impl Fn(DocId) -> bool + Copy, term_count: &mut usize) {
        if node.is_terminal {
            node.doc_ids.retain(|&id| keep(id));
            if node.doc_ids.is_empty() {
                node.is_terminal = false;
                *term_count = term_count.saturating_sub(1);
            }
        }
        for child in node.children.values_mut() {
            Self::retain_node(child, keep, term_count);
        }
        node.children.retain(|_, child| !child.children.is_empty() || child.is_terminal);
    }

    pub fn term_count(&self) -> usize {
        self.term_count
    }

    pub fn is_empty(&self) -> bool {
        self.term_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_returns_inserted_doc_ids() {
        let mut trie = Trie::new();
        trie.insert("apple", [0, 1]);
        let ids: Vec<DocId> = trie.get("apple").unwrap().iter().copied().collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn prefix_search_finds_all_terms_below() {
        let mut trie = Trie::new();
        trie.insert("apple", [0]);
        trie.insert("apricot", [1]);
        trie.insert("banana", [2]);
        let mut matches = trie.find_with_prefix("ap");
        matches.sort();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].0, "apple");
        assert_eq!(matches[1].0, "apricot");
    }

    #[test]
    fn missing_prefix_returns_empty() {
        let trie = Trie::new();
        assert!(trie.find_with_prefix("xyz").is_empty());
    }

    #[test]
    fn retain_doc_ids_prunes_empty_terminals() {
        let mut trie = Trie::new();
        trie.insert("apple", [0]);
        assert_eq!(trie.term_count(), 1);
        trie.retain_doc_ids(|id| id != 0);
        assert!(trie.get("apple").is_none());
        assert_eq!(trie.term_count(), 0);
    }

    #[test]
    fn inserting_same_term_twice_unions_doc_ids() {
        let mut trie = Trie::new();
        trie.insert("apple", [0]);
        trie.insert("apple", [1]);
        let ids: Vec<DocId> = trie.get("apple").unwrap().iter().copied().collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
