use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{StoreError, StoreResult};
use crate::models::{Document, OwnerContext, Template, TemplateData, TextStyle, TextStyleData};
use crate::repo::{materialize_template, upsert_by, DocumentStore, TemplateStore, TextStyleStore};

/// In-memory store for testing and as a stand-in for the hosted service.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Vec<Document>>>,
    templates: Arc<Mutex<Vec<Template>>>,
    text_styles: Arc<Mutex<Vec<TextStyle>>>,
}

fn lock<T>(m: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    async fn load_document(&self, id: &str) -> StoreResult<Option<Document>> {
        Ok(lock(&self.documents)?.iter().find(|d| d.id == id).cloned())
    }

    async fn save_document(&self, mut doc: Document) -> StoreResult<Document> {
        doc.touch();
        upsert_by(&mut *lock(&self.documents)?, doc.clone(), |d| d.id.clone());
        Ok(doc)
    }

    async fn list_documents(&self, owner: &OwnerContext) -> StoreResult<Vec<Document>> {
        let docs = lock(&self.documents)?;
        let mut listed: Vec<Document> = match owner {
            OwnerContext::User(user_id) => docs
                .iter()
                .filter(|d| d.owner_id.as_deref() == Some(user_id.as_str()))
                .cloned()
                .collect(),
            OwnerContext::Guest => docs.iter().filter(|d| d.owner_id.is_none()).cloned().collect(),
        };
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        let mut docs = lock(&self.documents)?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl TemplateStore for MemoryStore {
    async fn get_templates(&self) -> StoreResult<Vec<Template>> {
        Ok(lock(&self.templates)?.clone())
    }

    async fn save_template(&self, data: TemplateData) -> StoreResult<Template> {
        let template = materialize_template(data)?;
        upsert_by(&mut *lock(&self.templates)?, template.clone(), |t| t.id.clone());
        Ok(template)
    }
}

impl TextStyleStore for MemoryStore {
    async fn get_text_styles(&self) -> StoreResult<Vec<TextStyle>> {
        Ok(lock(&self.text_styles)?.clone())
    }

    async fn save_text_style(&self, data: TextStyleData) -> StoreResult<TextStyle> {
        let mut styles = lock(&self.text_styles)?;
        let is_used = data
            .id
            .as_ref()
            .and_then(|id| styles.iter().find(|s| &s.id == id))
            .map(|s| s.is_used)
            .unwrap_or(false);
        let style = data.into_style(is_used);
        upsert_by(&mut *styles, style.clone(), |s| s.id.clone());
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load_document() {
        let store = MemoryStore::new();

        // Initially empty
        assert!(store.list_documents(&OwnerContext::Guest).await.unwrap().is_empty());

        let doc = Document::new("Letter", "<p>Dear reader</p>");
        let id = doc.id.clone();
        store.save_document(doc).await.unwrap();

        let loaded = store.load_document(&id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Letter");
        assert_eq!(loaded.content, "<p>Dear reader</p>");
    }

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let store = MemoryStore::new();
        let mut doc = Document::new("v1", "<p>1</p>");
        store.save_document(doc.clone()).await.unwrap();
        doc.revise("v2", "<p>2</p>");
        store.save_document(doc.clone()).await.unwrap();

        let all = store.list_documents(&OwnerContext::Guest).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "v2");
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let store = MemoryStore::new();
        store
            .save_document(Document::new("mine", "").owned_by("u1"))
            .await
            .unwrap();
        store
            .save_document(Document::new("theirs", "").owned_by("u2"))
            .await
            .unwrap();

        let mine = store
            .list_documents(&OwnerContext::User("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_document("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_template_create_then_update() {
        let store = MemoryStore::new();
        let created = store
            .save_template(TemplateData {
                id: None,
                name: "Book".to_string(),
                styles: "p { margin: 0; }".to_string(),
            })
            .await
            .unwrap();

        store
            .save_template(TemplateData {
                id: Some(created.id.clone()),
                name: "Book 2".to_string(),
                styles: created.styles.clone(),
            })
            .await
            .unwrap();

        let templates = store.get_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Book 2");
    }

    #[tokio::test]
    async fn test_template_requires_name() {
        let store = MemoryStore::new();
        let err = store
            .save_template(TemplateData {
                id: None,
                name: "  ".to_string(),
                styles: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_text_style_update_keeps_usage_flag() {
        let store = MemoryStore::new();
        let style = store
            .save_text_style(TextStyleData {
                name: "Body".to_string(),
                selector: "p".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        store.text_styles.lock().unwrap()[0].is_used = true;

        let updated = store
            .save_text_style(TextStyleData {
                id: Some(style.id.clone()),
                name: "Body text".to_string(),
                selector: "p".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(updated.is_used);
        assert_eq!(store.get_text_styles().await.unwrap().len(), 1);
    }
}
