//! # Document de-duplication
//!
//! Repeated autosaves and imports can leave several copies of the same
//! document in a listing. [`deduplicate_documents`] collapses them:
//!
//! - two records with the same `id` are the same document;
//! - two records with the same trimmed title **and** the same trimmed content
//!   are copies of one another.
//!
//! The most recently updated record of each group survives and keeps the
//! position of the group's first occurrence.
//!
//! Content is compared by a SHA-1 [`fingerprint`] rather than by string, so
//! large documents are hashed once instead of compared pairwise.

use std::collections::HashMap;

use sha1::{Digest, Sha1};

use crate::models::Document;

/// A 20-byte SHA-1 digest of a document's title and content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 20]);

impl Fingerprint {
    /// Return the hex string representation.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Hash the trimmed title and trimmed content of a document.
pub fn fingerprint(doc: &Document) -> Fingerprint {
    let mut hasher = Sha1::new();
    hasher.update(doc.title.trim().as_bytes());
    // Separator keeps ("ab", "c") and ("a", "bc") apart.
    hasher.update([0u8]);
    hasher.update(doc.content.trim().as_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&result);
    Fingerprint(bytes)
}

/// Remove duplicate documents, keeping the most recently updated copy.
pub fn deduplicate_documents(docs: Vec<Document>) -> Vec<Document> {
    let total = docs.len();
    let mut kept: Vec<Document> = Vec::with_capacity(total);
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut by_print: HashMap<Fingerprint, usize> = HashMap::new();

    for doc in docs {
        let print = fingerprint(&doc);
        let slot = by_id
            .get(&doc.id)
            .or_else(|| by_print.get(&print))
            .copied();

        match slot {
            Some(idx) => {
                if doc.updated_at > kept[idx].updated_at {
                    // The replaced copy's title and content no longer name this group
                    let stale = fingerprint(&kept[idx]);
                    if by_print.get(&stale) == Some(&idx) {
                        by_print.remove(&stale);
                    }
                    by_id.insert(doc.id.clone(), idx);
                    by_print.insert(print, idx);
                    kept[idx] = doc;
                }
            }
            None => {
                let idx = kept.len();
                by_id.insert(doc.id.clone(), idx);
                by_print.insert(print, idx);
                kept.push(doc);
            }
        }
    }

    if kept.len() < total {
        tracing::debug!("Removed {} duplicate documents", total - kept.len());
    }
    kept
}
