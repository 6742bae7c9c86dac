use dioxus::prelude::*;
use editor::engine::{html, MemoryEngine, Position, Selection};
use editor::{
    Applied, AttributeField, Capabilities, EditorSession, FormattingToggle, RichTextEngine, Session,
};
use store::{Document, FolioConfig};

use crate::icons::{FaFloppyDisk, FaTrashCan};
use crate::{log_activity, use_activity_log, Icon, LogLevel, StaticPreview, Toolbar};

const EDITOR_CSS: Asset = asset!("/assets/editor.css");

/// Content the editor wants persisted for one document.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveRequest {
    pub document_id: String,
    pub content: String,
}

/// Editable surface for one document, with the toolbar the session's role
/// allows. Sessions that cannot edit get the static preview instead.
///
/// Remount (via `key`) to switch documents. The editor stays dirty until the
/// `document` prop comes back with the content it asked to save; `draft`
/// restores edits that never reached the store.
#[component]
pub fn DocumentEditor(
    document: Document,
    session: Session,
    config: FolioConfig,
    #[props(default)] template_css: String,
    #[props(default)] text_style_css: String,
    draft: Option<String>,
    on_save: EventHandler<SaveRequest>,
    on_delete: EventHandler<()>,
    #[props(default = 30)] auto_save_interval_secs: u32,
) -> Element {
    let capabilities = Capabilities::resolve(session.role);
    let mut editing = use_signal({
        let content = document.content.clone();
        let config = config.clone();
        move || {
            let mut editing = EditorSession::new(MemoryEngine::new(), &session, &config, &content).ok()?;
            if let Some(draft) = draft.as_deref() {
                editing.restore_draft(draft);
            }
            Some(editing)
        }
    });
    let mut compose = use_signal(String::new);
    let mut activity_log = use_activity_log();

    let document_id = document.id.clone();
    let request_save = move || {
        let pending = editing.peek().as_ref().and_then(|s| s.pending_save());
        if let Some(content) = pending {
            on_save.call(SaveRequest {
                document_id: document_id.clone(),
                content,
            });
        }
    };

    // Clean once the store hands back what was saved
    use_effect(use_reactive((&document.content,), move |(persisted,)| {
        let confirmed = editing
            .peek()
            .as_ref()
            .is_some_and(|s| s.pending_save().as_deref() == Some(persisted.as_str()));
        if confirmed {
            if let Some(s) = editing.write().as_mut() {
                s.confirm_saved(&persisted);
            }
        }
    }));

    // Save on unmount if dirty
    use_drop({
        let request_save = request_save.clone();
        move || request_save()
    });

    // Auto-save timer
    use_effect({
        let request_save = request_save.clone();
        move || {
            if auto_save_interval_secs == 0 {
                return;
            }
            let request_save = request_save.clone();
            spawn(async move {
                loop {
                    #[cfg(target_arch = "wasm32")]
                    gloo_timers::future::TimeoutFuture::new(auto_save_interval_secs * 1000).await;
                    #[cfg(not(target_arch = "wasm32"))]
                    tokio::time::sleep(std::time::Duration::from_secs(auto_save_interval_secs as u64)).await;

                    // Retries until the store confirms
                    request_save();
                }
            });
        }
    });

    let guard = editing.read();
    let Some(current) = guard.as_ref() else {
        return rsx! {
            StaticPreview {
                markup: document.content.clone(),
                template_css: template_css.clone(),
                text_style_css: text_style_css.clone(),
                framed: capabilities.framed_page,
            }
        };
    };

    let attributes = current.attributes().get().clone();
    let color_ambiguous = current.attributes().is_ambiguous(AttributeField::FontColor);
    let active: Vec<FormattingToggle> = FormattingToggle::ALL
        .into_iter()
        .filter(|t| current.is_active(*t))
        .collect();
    let dirty = current.is_dirty();
    let selected = current
        .engine()
        .selection()
        .map(|s| (s.from().block, s.to().block));
    let blocks: Vec<(usize, String, bool)> = current
        .engine()
        .blocks()
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let is_selected = selected.is_some_and(|(from, to)| (from..=to).contains(&i));
            (i, html::serialize(std::slice::from_ref(block)), is_selected)
        })
        .collect();
    drop(guard);

    let handle_save = move |_| request_save();

    let mut insert_composed = move || {
        let text = compose();
        if text.is_empty() {
            return;
        }
        if let Some(s) = editing.write().as_mut() {
            let engine = s.engine_mut();
            if engine.selection().is_none() {
                let last = engine.blocks().len() - 1;
                let end = engine.blocks()[last].char_len();
                engine.set_selection(Selection::caret(Position::new(last, end)));
            }
            engine.insert_text(&text);
        }
        compose.set(String::new());
    };

    rsx! {
        document::Stylesheet { href: EDITOR_CSS }
        style { "{template_css}\n{text_style_css}" }

        div {
            class: "document-editor",
            div {
                class: "document-editor-header",
                h2 { class: "document-title", "{document.title}" }
                if dirty {
                    span { class: "editor-unsaved", "Unsaved" }
                }
                button {
                    class: "icon-button",
                    title: "Save",
                    onclick: handle_save,
                    Icon { icon: FaFloppyDisk, width: 14, height: 14 }
                }
                button {
                    class: "icon-button",
                    title: "Delete document",
                    onclick: move |_| on_delete.call(()),
                    Icon { icon: FaTrashCan, width: 14, height: 14 }
                }
            }

            Toolbar {
                variant: capabilities.toolbar,
                attributes,
                active,
                color_ambiguous,
                on_toggle: move |toggle: FormattingToggle| {
                    let applied = editing.write().as_mut().map(|s| s.apply(toggle));
                    if applied == Some(Applied::Skipped) {
                        log_activity(&mut activity_log, LogLevel::Info, "Select text before formatting");
                    }
                },
                on_color: move |color: String| {
                    if let Some(s) = editing.write().as_mut() {
                        s.set_color(&color);
                    }
                },
                on_font_family: move |family: String| {
                    if let Some(s) = editing.write().as_mut() {
                        s.set_font_family(&family);
                    }
                },
                on_font_size: move |size: String| {
                    if let Some(s) = editing.write().as_mut() {
                        s.set_font_size(&size);
                    }
                },
            }

            div {
                class: if capabilities.framed_page { "page-frame framed" } else { "page-frame" },
                div {
                    class: "template-styled editable-surface",
                    for (index, markup, is_selected) in blocks {
                        div {
                            key: "{index}",
                            class: if is_selected { "editable-block selected" } else { "editable-block" },
                            onclick: move |_| {
                                if let Some(s) = editing.write().as_mut() {
                                    let engine = s.engine_mut();
                                    let len = engine.blocks().get(index).map(|b| b.char_len()).unwrap_or(0);
                                    engine.set_selection(Selection::range(
                                        Position::new(index, 0),
                                        Position::new(index, len),
                                    ));
                                }
                            },
                            dangerous_inner_html: "{markup}",
                        }
                    }
                }
            }

            div {
                class: "compose-bar",
                button {
                    class: "compose-select-all",
                    onclick: move |_| {
                        if let Some(s) = editing.write().as_mut() {
                            s.engine_mut().select_all();
                        }
                    },
                    "Select all"
                }
                input {
                    class: "compose-input",
                    r#type: "text",
                    placeholder: "Type and press Enter to insert at the selection",
                    value: compose(),
                    oninput: move |evt: FormEvent| compose.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            insert_composed();
                        }
                    },
                }
            }
        }
    }
}
