pub mod config;
pub mod dedup;
pub mod error;
pub mod guest;
pub mod kv;
pub mod models;
pub mod repo;

mod file_store;
pub use file_store::FileKv;

mod memory;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web_storage::LocalStorageKv;

pub use config::FolioConfig;
pub use dedup::deduplicate_documents;
pub use error::{StoreError, StoreResult};
pub use guest::GuestStore;
pub use kv::{KvBackend, MemoryKv};
pub use models::{Document, OwnerContext, Template, TemplateData, TextStyle, TextStyleData};
pub use repo::{DocumentStore, TemplateStore, TextStyleStore};
