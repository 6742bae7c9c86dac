//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod repo;
pub use repo::{forget_session, load_config, make_guest_store, make_kv, remember_session, restore_session};

pub mod views;

pub const APP_CSS: Asset = asset!("/assets/app.css");

pub mod activity_log;
pub use activity_log::{log_activity, use_activity_log, ActivityLog, ActivityLogPanel, LogLevel};

mod session;
pub use session::{use_session, RolePicker, SessionBar, SessionProvider};

mod toolbar;
pub use toolbar::Toolbar;

mod preview;
pub use preview::StaticPreview;

mod document_editor;
pub use document_editor::{DocumentEditor, SaveRequest};

mod document_list;
pub use document_list::DocumentList;

mod template_panel;
pub use template_panel::TemplatePanel;
