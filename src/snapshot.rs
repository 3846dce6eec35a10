//! Snapshot/restore wire format (§6): a version-tagged JSON document
//! carrying the document store, every posting table as `(key, doc_ids)`
//! arrays, BM25 stats if present, the Bloom filter as a byte array plus
//! its size/hash-count, and the language tags used. Language processors
//! are not serialized themselves; they are re-materialized by name from
//! the host's registry on restore.
//!
//! These DTOs stay decoupled from the internal types they mirror (see
//! `result::MatchTypeLabel` for the same pattern), so `Document`'s and
//! `Bm25Stats`' invariants never have to double as a wire contract.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::index::document::DocId;

/// Bumped whenever the wire format changes incompatibly. Restoring a
/// snapshot tagged with a different version is a fatal error (§6).
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub languages: Vec<String>,
    pub config: EngineConfig,
    pub declared_fields: Vec<String>,
    pub field_weights: Vec<(String, f64)>,
    pub field_data: Vec<(String, Vec<(String, String)>)>,
    pub documents: Vec<DocumentDto>,
    pub backend: BackendSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentDto {
    pub base_id: String,
    pub original: String,
    pub normalized: String,
    pub phonetic: Option<String>,
    pub language: String,
    pub compound_parts: Vec<String>,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum BackendSnapshot {
    Inverted {
        term_postings: Vec<(String, Vec<DocId>)>,
        phonetic_postings: Vec<(String, Vec<DocId>)>,
        ngram_postings: Vec<(String, Vec<DocId>)>,
        synonym_postings: Vec<(String, Vec<DocId>)>,
        bloom: Option<BloomSnapshot>,
        bm25: Option<Bm25Snapshot>,
    },
    Hash {
        variant: Vec<(String, Vec<DocId>)>,
        phonetic: Vec<(String, Vec<DocId>)>,
        ngram: Vec<(String, Vec<DocId>)>,
        synonym: Vec<(String, Vec<DocId>)>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BloomSnapshot {
    pub bytes: Vec<u8>,
    pub num_bits: usize,
    pub num_hashes: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Bm25Snapshot {
    pub doc_lengths: Vec<(DocId, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_is_detectable_before_full_decode() {
        let snapshot = EngineSnapshot {
            version: SNAPSHOT_VERSION + 1,
            languages: vec!["english".into()],
            config: EngineConfig::balanced(),
            declared_fields: vec![],
            field_weights: vec![],
            field_data: vec![],
            documents: vec![],
            backend: BackendSnapshot::Hash { variant: vec![], phonetic: vec![], ngram: vec![], synonym: vec![] },
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: EngineSnapshot = serde_json::from_str(&json).unwrap();
        assert_ne!(decoded.version, SNAPSHOT_VERSION);
    }
}
