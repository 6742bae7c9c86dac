//! # Key-value backends for the guest fallback
//!
//! Guest sessions have no account, so their data lives in device-local
//! key-value storage: `localStorage` in the browser, plain files on desktop.
//! [`KvBackend`] is the minimal synchronous surface [`crate::GuestStore`]
//! needs. Values are JSON strings.
//!
//! | Backend | Platform |
//! |---------|----------|
//! | [`MemoryKv`] | tests, ephemeral sessions |
//! | [`crate::FileKv`] | desktop / mobile |
//! | `LocalStorageKv` | web (`wasm32` + `web` feature) |

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};

/// Synchronous string key-value storage.
pub trait KvBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

/// In-memory key-value backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory kv lock poisoned".to_string())
    }
}

impl KvBackend for MemoryKv {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let items = self.items.lock().map_err(|_| Self::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut items = self.items.lock().map_err(|_| Self::poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let mut items = self.items.lock().map_err(|_| Self::poisoned())?;
        items.remove(key);
        Ok(())
    }
}
