//! # Guest fallback store
//!
//! [`GuestStore`] implements the persistence collaborators on top of any
//! [`KvBackend`]. It mirrors what the browser app keeps in `localStorage` for
//! unauthenticated sessions:
//!
//! | Key | Value |
//! |-----|-------|
//! | `"<role>Documents"` | JSON array of [`Document`] |
//! | `"templates"` | JSON array of [`Template`] |
//! | `"textStyles"` | JSON array of [`TextStyle`] |
//!
//! Documents are scoped by role: a guest editor and a guest designer on the
//! same device see separate document lists. Templates and text styles are
//! shared.
//!
//! Listing de-duplicates the stored array and, when duplicates were found,
//! writes the cleaned array back so the cleanup sticks.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dedup::deduplicate_documents;
use crate::error::{StoreError, StoreResult};
use crate::kv::KvBackend;
use crate::models::{Document, OwnerContext, Template, TemplateData, TextStyle, TextStyleData};
use crate::repo::{materialize_template, upsert_by, DocumentStore, TemplateStore, TextStyleStore};

const TEMPLATES_KEY: &str = "templates";
const TEXT_STYLES_KEY: &str = "textStyles";

/// Key under which a role's guest documents are stored.
pub fn documents_key(role: &str) -> String {
    format!("{role}Documents")
}

/// Persistence for guest sessions, backed by device-local key-value storage.
#[derive(Clone, Debug)]
pub struct GuestStore<K: KvBackend> {
    kv: K,
    documents_key: String,
}

impl<K: KvBackend> GuestStore<K> {
    /// Create a store scoped to a role name such as `"editor"`.
    pub fn new(kv: K, role: &str) -> Self {
        Self {
            kv,
            documents_key: documents_key(role),
        }
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    fn read_array<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.kv.get_item(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write_array<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)?;
        self.kv.set_item(key, &raw)
    }

    fn read_documents(&self) -> StoreResult<Vec<Document>> {
        self.read_array(&self.documents_key)
    }
}

impl<K: KvBackend> DocumentStore for GuestStore<K> {
    async fn load_document(&self, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.read_documents()?.into_iter().find(|d| d.id == id))
    }

    async fn save_document(&self, mut doc: Document) -> StoreResult<Document> {
        if doc.owner_id.is_some() {
            return Err(StoreError::Invalid(
                "guest storage cannot hold owned documents".to_string(),
            ));
        }
        let mut docs = self.read_documents()?;
        doc.touch();
        upsert_by(&mut docs, doc.clone(), |d| d.id.clone());
        self.write_array(&self.documents_key, &docs)?;
        Ok(doc)
    }

    async fn list_documents(&self, _owner: &OwnerContext) -> StoreResult<Vec<Document>> {
        let stored = self.read_documents()?;
        let stored_len = stored.len();
        let unique = deduplicate_documents(stored);
        if unique.len() != stored_len {
            tracing::info!(
                "Removed {} duplicate guest documents from {}",
                stored_len - unique.len(),
                self.documents_key
            );
            self.write_array(&self.documents_key, &unique)?;
        }
        Ok(unique)
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        let mut docs = self.read_documents()?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write_array(&self.documents_key, &docs)
    }
}

impl<K: KvBackend> TemplateStore for GuestStore<K> {
    async fn get_templates(&self) -> StoreResult<Vec<Template>> {
        self.read_array(TEMPLATES_KEY)
    }

    async fn save_template(&self, data: TemplateData) -> StoreResult<Template> {
        let template = materialize_template(data)?;
        let mut templates: Vec<Template> = self.read_array(TEMPLATES_KEY)?;
        upsert_by(&mut templates, template.clone(), |t| t.id.clone());
        self.write_array(TEMPLATES_KEY, &templates)?;
        Ok(template)
    }
}

impl<K: KvBackend> TextStyleStore for GuestStore<K> {
    async fn get_text_styles(&self) -> StoreResult<Vec<TextStyle>> {
        self.read_array(TEXT_STYLES_KEY)
    }

    async fn save_text_style(&self, data: TextStyleData) -> StoreResult<TextStyle> {
        let mut styles: Vec<TextStyle> = self.read_array(TEXT_STYLES_KEY)?;
        let is_used = data
            .id
            .as_ref()
            .and_then(|id| styles.iter().find(|s| &s.id == id))
            .map(|s| s.is_used)
            .unwrap_or(false);
        let style = data.into_style(is_used);
        upsert_by(&mut styles, style.clone(), |s| s.id.clone());
        self.write_array(TEXT_STYLES_KEY, &styles)?;
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[tokio::test]
    async fn test_documents_scoped_by_role() {
        let kv = MemoryKv::new();
        let editor = GuestStore::new(kv.clone(), "editor");
        let designer = GuestStore::new(kv.clone(), "designer");

        editor.save_document(Document::new("Memo", "<p>m</p>")).await.unwrap();

        assert_eq!(editor.list_documents(&OwnerContext::Guest).await.unwrap().len(), 1);
        assert!(designer.list_documents(&OwnerContext::Guest).await.unwrap().is_empty());
        assert!(kv.get_item("editorDocuments").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_listing_writes_back_deduplicated() {
        let kv = MemoryKv::new();
        let mut first = Document::new("Same", "<p>same</p>");
        first.updated_at = 1;
        let mut second = Document::new("Same", "<p>same</p>");
        second.updated_at = 2;
        kv.set_item("editorDocuments", &serde_json::to_string(&vec![first, second.clone()]).unwrap())
            .unwrap();

        let store = GuestStore::new(kv.clone(), "editor");
        let listed = store.list_documents(&OwnerContext::Guest).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second.id);

        let raw = kv.get_item("editorDocuments").unwrap().unwrap();
        let stored: Vec<Document> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let store = GuestStore::new(MemoryKv::new(), "admin");
        let doc = store.save_document(Document::new("a", "")).await.unwrap();
        store.save_document(Document::new("b", "x")).await.unwrap();

        store.delete_document(&doc.id).await.unwrap();
        let left = store.list_documents(&OwnerContext::Guest).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "b");
        assert!(store.load_document(&doc.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_owned_documents() {
        let store = GuestStore::new(MemoryKv::new(), "editor");
        let err = store
            .save_document(Document::new("x", "").owned_by("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_corrupt_array_is_serialization_error() {
        let kv = MemoryKv::new();
        kv.set_item("editorDocuments", "{not json").unwrap();
        let store = GuestStore::new(kv, "editor");
        let err = store.list_documents(&OwnerContext::Guest).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_templates_shared_across_roles() {
        let kv = MemoryKv::new();
        let designer = GuestStore::new(kv.clone(), "designer");
        let editor = GuestStore::new(kv, "editor");
        designer
            .save_template(TemplateData {
                id: None,
                name: "Trade paperback".to_string(),
                styles: ".template-styled { width: 6in; height: 9in; min-height: 9in; }".to_string(),
            })
            .await
            .unwrap();
        let seen = editor.get_templates().await.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "Trade paperback");
    }
}
