//! # Editor configuration — `folio.toml`
//!
//! Defines the TOML configuration file read at startup
//! (filename: [`FolioConfig::filename`] = `"folio.toml"`). It carries the
//! defaults the editing session falls back to.
//!
//! ## Structure
//!
//! ```toml
//! [attributes]
//! font_family = "Inter"
//! font_size = "16px"
//! color = "#000000"      # the document's implicit text color
//!
//! [page]
//! width = "8.5in"
//! height = "11in"
//!
//! [editing]
//! max_indent = 10
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`FolioConfig`] | Top-level config. TOML (de)serialisation and the canonical filename. |
//! | [`AttributesConfig`] | Attributes applied to the next typed character when nothing else is set. |
//! | [`PageConfig`] | Page size used when a template carries no dimensions rule. |
//! | [`EditingConfig`] | Editing limits, currently the indent ceiling. |
//!
//! All structs default field by field, so a missing or empty file is equivalent
//! to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `folio.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub attributes: AttributesConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub editing: EditingConfig,
}

/// Default text attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributesConfig {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_font_size() -> String {
    "16px".to_string()
}

fn default_color() -> String {
    "#000000".to_string()
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_color(),
        }
    }
}

/// Fallback page size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_page_width")]
    pub width: String,
    #[serde(default = "default_page_height")]
    pub height: String,
}

fn default_page_width() -> String {
    "8.5in".to_string()
}

fn default_page_height() -> String {
    "11in".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
        }
    }
}

/// Editing limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditingConfig {
    /// Highest indent level a block can reach. Values above 10 are capped.
    #[serde(default = "default_max_indent")]
    pub max_indent: u8,
}

fn default_max_indent() -> u8 {
    10
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            max_indent: default_max_indent(),
        }
    }
}

impl FolioConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "folio.toml"
    }

    /// Builder method to set the fallback page size.
    pub fn with_page(mut self, width: &str, height: &str) -> Self {
        self.page.width = width.to_string();
        self.page.height = height.to_string();
        self
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read `folio.toml` from a directory, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_from_dir(dir: &std::path::Path) -> Self {
        let path = dir.join(Self::filename());
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::from_toml(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
