//! # Persistence collaborators
//!
//! The editor never talks to a database directly. Everything it persists goes
//! through the three async traits defined here, so the same UI logic runs
//! against the hosted service, the in-memory [`crate::MemoryStore`], or the
//! per-role guest fallback [`crate::GuestStore`].
//!
//! | Trait | Records | Operations |
//! |-------|---------|------------|
//! | [`DocumentStore`] | [`Document`] | `load_document`, `save_document`, `list_documents`, `delete_document` |
//! | [`TemplateStore`] | [`Template`] | `get_templates`, `save_template` |
//! | [`TextStyleStore`] | [`TextStyle`] | `get_text_styles`, `save_text_style` |
//!
//! Failures come back as [`StoreError`]. Callers surface them to the user and
//! keep their local state, so no edit is lost when a save fails.

use crate::error::StoreResult;
use crate::models::{Document, OwnerContext, Template, TemplateData, TextStyle, TextStyleData};

/// Async document persistence.
pub trait DocumentStore {
    fn load_document(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<Document>>>;
    /// Insert or replace by id. Returns the stored record.
    fn save_document(
        &self,
        doc: Document,
    ) -> impl std::future::Future<Output = StoreResult<Document>>;
    fn list_documents(
        &self,
        owner: &OwnerContext,
    ) -> impl std::future::Future<Output = StoreResult<Vec<Document>>>;
    fn delete_document(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>>;
}

/// Async template persistence.
pub trait TemplateStore {
    fn get_templates(&self) -> impl std::future::Future<Output = StoreResult<Vec<Template>>>;
    /// Create (no id) or update (existing id) a template.
    fn save_template(
        &self,
        data: TemplateData,
    ) -> impl std::future::Future<Output = StoreResult<Template>>;
}

/// Async text-style persistence.
pub trait TextStyleStore {
    fn get_text_styles(&self) -> impl std::future::Future<Output = StoreResult<Vec<TextStyle>>>;
    fn save_text_style(
        &self,
        data: TextStyleData,
    ) -> impl std::future::Future<Output = StoreResult<TextStyle>>;
}

/// Build the stored template for `data`, reusing the id when one is given.
pub(crate) fn materialize_template(data: TemplateData) -> StoreResult<Template> {
    if data.name.trim().is_empty() {
        return Err(crate::StoreError::Invalid("template name required".to_string()));
    }
    Ok(Template {
        id: data.id.unwrap_or_else(crate::models::new_id),
        name: data.name,
        styles: data.styles,
    })
}

/// Insert or replace `item` in `items` by key, preserving order.
pub(crate) fn upsert_by<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let k = key(&item);
    match items.iter().position(|existing| key(existing) == k) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}
