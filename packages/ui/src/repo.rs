//! Platform storage for guest sessions.
//!
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStorageKv`]
//! - **Desktop / native**: one JSON file per key under `<data_dir>/folio/`

use editor::{Role, Session};
use serde::{Deserialize, Serialize};
use store::{FolioConfig, GuestStore, KvBackend};

const SESSION_KEY: &str = "session";

/// Key-value backend for the current platform.
pub fn make_kv() -> impl KvBackend + Clone {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageKv::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::FileKv::new(data_dir())
    }
}

/// Guest persistence scoped to `role`'s document list.
pub fn make_guest_store(role: Option<Role>) -> GuestStore<impl KvBackend + Clone> {
    GuestStore::new(make_kv(), role.map(|r| r.as_str()).unwrap_or("guest"))
}

/// `folio.toml` from the data directory on native targets; defaults on the web.
pub fn load_config() -> FolioConfig {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        FolioConfig::default()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        FolioConfig::load_from_dir(&data_dir())
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("folio")
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    role: Option<Role>,
}

/// The guest session remembered from the last visit, if any.
pub fn restore_session() -> Option<Session> {
    let raw = match make_kv().get_item(SESSION_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!("Could not read saved session: {}", e);
            return None;
        }
    };
    match serde_json::from_str::<StoredSession>(&raw) {
        Ok(stored) => Some(Session::guest(stored.role)),
        Err(e) => {
            tracing::warn!("Ignoring malformed saved session: {}", e);
            None
        }
    }
}

pub fn remember_session(session: &Session) {
    let stored = StoredSession { role: session.role };
    let result = serde_json::to_string(&stored)
        .map_err(store::StoreError::from)
        .and_then(|raw| make_kv().set_item(SESSION_KEY, &raw));
    if let Err(e) = result {
        tracing::warn!("Could not save session: {}", e);
    }
}

pub fn forget_session() {
    if let Err(e) = make_kv().remove_item(SESSION_KEY) {
        tracing::warn!("Could not clear saved session: {}", e);
    }
}
