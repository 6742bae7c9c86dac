//! # `localStorage` backend — browser-side guest persistence
//!
//! [`LocalStorageKv`] is the [`KvBackend`] used on the **web platform**. It
//! reads and writes the window's `localStorage` through `web-sys`.
//!
//! The handle is looked up on every call: `web_sys::Storage` is not `Clone`,
//! and the lookup is cheap. A missing window or storage (private browsing,
//! sandboxed iframes) surfaces as [`StoreError::Unavailable`], which the UI
//! reports without losing the in-memory document.

use crate::error::{StoreError, StoreResult};
use crate::kv::KvBackend;

/// `localStorage`-backed key-value store.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageKv;

impl LocalStorageKv {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".to_string()))
    }
}

impl KvBackend for LocalStorageKv {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable(format!("read {key} failed")))
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable(format!("write {key} failed")))
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| StoreError::Unavailable(format!("remove {key} failed")))
    }
}
