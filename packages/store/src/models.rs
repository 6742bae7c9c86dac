//! # Domain models for documents, templates and text styles
//!
//! Defines the records the persistence collaborators in [`crate::repo`] read and
//! write. Every type is `Serialize + Deserialize` so the same shape works for the
//! hosted service and for the JSON arrays kept by the guest fallback.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Document`] | A rich-text document: serialized markup `content`, a `title`, the owning user (absent for guests) and the template it was last styled with. |
//! | [`Template`] | A designer-managed page template. `styles` is a CSS string that carries the page dimensions rule. |
//! | [`TextStyle`] | A named typography preset that compiles to one CSS rule. |
//! | [`OwnerContext`] | Whose documents a listing should return. |
//!
//! Timestamps are Unix milliseconds, see [`current_timestamp`].

use serde::{Deserialize, Serialize};

/// A saved document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Serialized rich-text markup.
    pub content: String,
    /// Authenticated owner, or None for guest documents.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Document {
    /// Create a new untitled-or-titled document with a fresh id.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = current_timestamp();
        Self {
            id: new_id(),
            title: title.into(),
            content: content.into(),
            owner_id: None,
            template_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set the owner.
    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Replace title and content and bump `updated_at`.
    pub fn revise(&mut self, title: &str, content: &str) {
        self.title = title.to_string();
        self.content = content.to_string();
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        // Keep updated_at strictly increasing so "most recent" is well defined
        // even when two saves land within the same millisecond.
        self.updated_at = current_timestamp().max(self.updated_at + 1);
    }
}

/// A page template managed by designers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// CSS applied to the static preview; contains the `.template-styled` dimensions rule.
    pub styles: String,
}

/// Input for [`crate::TemplateStore::save_template`]. A missing id creates a new template.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateData {
    pub id: Option<String>,
    pub name: String,
    pub styles: String,
}

/// A named typography preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub id: String,
    pub name: String,
    /// CSS selector the style targets, e.g. `"h1"` or `"p.caption"`.
    pub selector: String,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub line_height: Option<String>,
    #[serde(default)]
    pub margin_top: Option<String>,
    #[serde(default)]
    pub margin_bottom: Option<String>,
    #[serde(default)]
    pub text_align: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_used: bool,
}

/// Input for [`crate::TextStyleStore::save_text_style`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyleData {
    pub id: Option<String>,
    pub name: String,
    pub selector: String,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub line_height: Option<String>,
    pub margin_top: Option<String>,
    pub margin_bottom: Option<String>,
    pub text_align: Option<String>,
    pub is_default: bool,
}

impl TextStyleData {
    /// Materialize into a stored style, keeping `id` if present.
    pub fn into_style(self, is_used: bool) -> TextStyle {
        TextStyle {
            id: self.id.unwrap_or_else(new_id),
            name: self.name,
            selector: self.selector,
            font_family: self.font_family,
            font_size: self.font_size,
            font_weight: self.font_weight,
            color: self.color,
            line_height: self.line_height,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            text_align: self.text_align,
            is_default: self.is_default,
            is_used,
        }
    }
}

/// Scope of a document listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerContext {
    /// Documents owned by an authenticated user.
    User(String),
    /// Everything in the store (guest stores are already scoped by role).
    Guest,
}

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Milliseconds since the Unix epoch, platform-aware.
pub fn current_timestamp() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}
