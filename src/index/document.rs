//! The document store: an append-only table of indexed entries, each with
//! a dense integer id assigned in insertion order (§3 "Document").

use ahash::AHashMap;

/// Dense document id. Never reused, even after a logical delete.
pub type DocId = u32;

/// One indexed entry: original text, its normalized form, optional
/// phonetic code, the language tag it was processed under, and any
/// compound parts its processor produced.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    /// Canonical base id (first field value for records; the string itself
    /// for raw strings).
    pub base_id: String,
    pub original: String,
    pub normalized: String,
    pub phonetic: Option<String>,
    pub language: String,
    pub compound_parts: Vec<String>,
    /// `true` once `remove` has logically deleted this document.
    pub deleted: bool,
}

/// Append-only store of [`Document`]s, plus the base-id → doc-id index used
/// for duplicate suppression and removal.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    base_id_to_doc: AHashMap<String, DocId>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore::default()
    }

    /// Inserts a new document, returning its id. The caller is responsible
    /// for duplicate suppression before calling this (see [`Self::contains_base_id`]).
    pub fn insert(
        &mut self,
        base_id: String,
        original: String,
        normalized: String,
        phonetic: Option<String>,
        language: String,
        compound_parts: Vec<String>,
    ) -> DocId {
        let id = self.documents.len() as DocId;
        self.base_id_to_doc.insert(base_id.to_lowercase(), id);
        self.documents.push(Document {
            id,
            base_id,
            original,
            normalized,
            phonetic,
            language,
            compound_parts,
            deleted: false,
        });
        id
    }

    pub fn contains_base_id(&self, base_id: &str) -> bool {
        self.base_id_to_doc.contains_key(&base_id.to_lowercase())
    }

    pub fn doc_id_for_base_id(&self, base_id: &str) -> Option<DocId> {
        self.base_id_to_doc.get(&base_id.to_lowercase()).copied()
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id as usize).filter(|doc| !doc.deleted)
    }

    /// Marks `base_id`'s document deleted. Returns `true` if it existed and
    /// was not already deleted.
    pub fn mark_deleted(&mut self, base_id: &str) -> bool {
        let lowered = base_id.to_lowercase();
        if let Some(&id) = self.base_id_to_doc.get(&lowered) {
            let doc = &mut self.documents[id as usize];
            if !doc.deleted {
                doc.deleted = true;
                self.base_id_to_doc.remove(&lowered);
                return true;
            }
        }
        false
    }

    /// Iterates every live (non-deleted) document.
    pub fn iter_live(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|doc| !doc.deleted)
    }

    /// Iterates every document, live or logically deleted, in id order.
    /// Used by snapshotting, which preserves the exact id allocation.
    pub fn iter_all(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Rebuilds a store from a flat, id-ordered document list (§6
    /// snapshot restore): the base-id index is rebuilt from the
    /// non-deleted entries.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let mut base_id_to_doc = AHashMap::default();
        for doc in &documents {
            if !doc.deleted {
                base_id_to_doc.insert(doc.base_id.to_lowercase(), doc.id);
            }
        }
        DocumentStore { documents, base_id_to_doc }
    }

    pub fn len(&self) -> usize {
        self.base_id_to_doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_id_to_doc.is_empty()
    }

    /// Total document count including logical deletes, i.e. the next id
    /// that would be assigned.
    pub fn total_slots(&self) -> usize {
        self.documents.len()
    }

    pub fn average_length(&self) -> f64 {
        let lengths: Vec<usize> = self
            .iter_live()
            .map(|doc| doc.normalized.split_whitespace().count().max(1))
            .collect();
        if lengths.is_empty() {
            return 0.0;
        }
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    }
}
