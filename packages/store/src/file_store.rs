//! # Filesystem-backed key-value store
//!
//! [`FileKv`] is a [`KvBackend`] that keeps one file per key. It backs the
//! guest fallback on desktop and mobile, where there is no `localStorage`.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── editorDocuments.json
//! ├── designerDocuments.json
//! ├── templates.json
//! └── textStyles.json
//! ```
//!
//! ## Platform data directories
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/folio/` |
//! | Linux | `~/.local/share/folio/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\folio\` |

use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::kv::KvBackend;

/// Filesystem-backed key-value store for desktop and mobile guests.
#[derive(Clone, Debug)]
pub struct FileKv {
    base: PathBuf,
}

impl FileKv {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn item_path(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Invalid(format!("bad storage key: {key:?}")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }

    /// Delete every stored key. A store that was never written is already clear.
    pub fn clear(&self) -> StoreResult<()> {
        match std::fs::remove_dir_all(&self.base) {
            Ok(()) => {
                tracing::debug!("Cleared guest storage at {}", self.base.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KvBackend for FileKv {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.item_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.item_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        match std::fs::remove_file(self.item_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::GuestStore;
    use crate::models::{Document, OwnerContext};
    use crate::repo::DocumentStore;

    #[tokio::test]
    async fn test_file_kv_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("folio_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let guest = GuestStore::new(FileKv::new(dir.clone()), "editor");
        guest
            .save_document(Document::new("hello", "<p>Hello from FileKv!</p>"))
            .await
            .unwrap();

        // Re-open from same directory
        let reopened = GuestStore::new(FileKv::new(dir.clone()), "editor");
        let docs = reopened.list_documents(&OwnerContext::Guest).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "hello");
        assert_eq!(docs[0].content, "<p>Hello from FileKv!</p>");

        FileKv::new(dir).clear().unwrap();
    }

    #[test]
    fn test_clear_removes_items_and_tolerates_missing_dir() {
        let dir = std::env::temp_dir().join(format!("folio_clear_{}", std::process::id()));
        let kv = FileKv::new(dir.clone());
        kv.set_item("templates", "[]").unwrap();

        kv.clear().unwrap();
        assert_eq!(kv.get_item("templates").unwrap(), None);
        assert!(!dir.exists());
        kv.clear().unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let kv = FileKv::new(std::env::temp_dir());
        assert!(matches!(kv.get_item("../etc"), Err(StoreError::Invalid(_))));
        assert!(matches!(kv.set_item("", "x"), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_missing_key_reads_none() {
        let dir = std::env::temp_dir().join(format!("folio_missing_{}", std::process::id()));
        let kv = FileKv::new(dir);
        assert_eq!(kv.get_item("nothing").unwrap(), None);
        kv.remove_item("nothing").unwrap();
    }
}
