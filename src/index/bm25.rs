//! BM25 corpus statistics and scoring (§3, §4.9): per-term document
//! frequency, per-document length, corpus size, average document length,
//! and the BM25 term-frequency/inverse-document-frequency formula.

use ahash::AHashMap;

use super::document::DocId;
use super::postings::PostingTable;
use crate::config::Bm25Config;

/// Corpus-wide statistics needed to score a term against a document under
/// BM25: document frequencies, per-document lengths, corpus size, and
/// average document length.
#[derive(Debug, Clone, Default)]
pub struct Bm25Stats {
    doc_lengths: AHashMap<DocId, usize>,
    corpus_size: usize,
    avg_doc_length: f64,
}

impl Bm25Stats {
    /// Builds stats from every live document's token count.
    pub fn build(doc_lengths: impl IntoIterator<Item = (DocId, usize)>) -> Self {
        let doc_lengths: AHashMap<DocId, usize> = doc_lengths.into_iter().collect();
        let corpus_size = doc_lengths.len();
        let avg_doc_length = if corpus_size == 0 {
            0.0
        } else {
            doc_lengths.values().sum::<usize>() as f64 / corpus_size as f64
        };
        Bm25Stats { doc_lengths, corpus_size, avg_doc_length }
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }

    pub fn average_document_length(&self) -> f64 {
        self.avg_doc_length
    }

    pub fn document_length(&self, doc_id: DocId) -> usize {
        self.doc_lengths.get(&doc_id).copied().unwrap_or(1)
    }

    /// Every `(doc_id, length)` pair, for snapshotting (§6).
    pub fn doc_lengths(&self) -> impl Iterator<Item = (DocId, usize)> + '_ {
        self.doc_lengths.iter().map(|(&id, &len)| (id, len))
    }

    /// `IDF = ln((N - df + 0.5)/(df + 0.5) + 1)`, floored at `config.min_idf`
    /// so scores never go negative.
    pub fn idf(&self, term_postings: &PostingTable, term: &str, config: &Bm25Config) -> f64 {
        let df = term_postings.doc_frequency(term);
        if df == 0 || self.corpus_size == 0 {
            return config.min_idf;
        }
        let n = self.corpus_size as f64;
        let df = df as f64;
        let raw = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
        raw.max(config.min_idf)
    }

    /// `IDF · (tf·(k1+1)) / (tf + k1·(1 − b + b·|D|/avgdl))`.
    pub fn term_score(&self, doc_id: DocId, term_freq: f64, idf: f64, config: &Bm25Config) -> f64 {
        if term_freq <= 0.0 {
            return 0.0;
        }
        let doc_len = self.document_length(doc_id) as f64;
        let avgdl = if self.avg_doc_length > 0.0 { self.avg_doc_length } else { 1.0 };
        let denom = term_freq + config.k1 * (1.0 - config.b + config.b * (doc_len / avgdl));
        idf * (term_freq * (config.k1 + 1.0)) / denom
    }

    /// Sigmoid normalization of a raw BM25 score into `(0, 1)`, scaled by
    /// the maximum observed score in the candidate set.
    pub fn normalize(raw_score: f64, max_score: f64) -> f64 {
        if max_score <= 0.0 {
            return 0.0;
        }
        let scaled = raw_score / max_score;
        1.0 / (1.0 + (-(scaled * 6.0 - 3.0)).exp())
    }
}
