use std::collections::HashMap;

use dioxus::prelude::*;
use editor::{ensure_dimensions, generate_css_from_text_styles, PageDimensions, Session};
use store::{
    Document, DocumentStore, Template, TemplateData, TemplateStore, TextStyle, TextStyleData, TextStyleStore,
};

use crate::repo::{load_config, make_guest_store};
use crate::{
    log_activity, use_activity_log, use_session, DocumentEditor, DocumentList, LogLevel, RolePicker, SaveRequest,
    SessionBar, StaticPreview, TemplatePanel,
};

/// Top-level screen: the role picker until a session exists, then the
/// workspace for that session.
#[component]
pub fn WorkspaceView() -> Element {
    let session = use_session();
    let Some(current) = session() else {
        return rsx! { RolePicker {} };
    };
    let namespace = current.storage_namespace();

    rsx! {
        SessionBar {}
        Workspace { key: "{namespace}", session: current }
    }
}

#[component]
fn Workspace(session: Session) -> Element {
    let capabilities = session.capabilities();
    let role = session.role;
    let owner = session.owner();

    let config = use_signal(load_config);
    let mut documents = use_signal(Vec::<Document>::new);
    let mut templates = use_signal(Vec::<Template>::new);
    let mut text_styles = use_signal(Vec::<TextStyle>::new);
    let mut active_id = use_signal(|| Option::<String>::None);
    // Editor content the store has not confirmed yet, by document id
    let mut drafts = use_signal(HashMap::<String, String>::new);
    let mut activity_log = use_activity_log();

    let _loader = use_resource(move || {
        let owner = owner.clone();
        async move {
            let store = make_guest_store(role);
            match store.list_documents(&owner).await {
                Ok(docs) => {
                    if active_id.peek().is_none() {
                        active_id.set(docs.first().map(|d| d.id.clone()));
                    }
                    documents.set(docs);
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Warning, &format!("Load documents: {e}")),
            }
            match store.get_templates().await {
                Ok(list) => templates.set(list),
                Err(e) => log_activity(&mut activity_log, LogLevel::Warning, &format!("Load templates: {e}")),
            }
            match store.get_text_styles().await {
                Ok(list) => text_styles.set(list),
                Err(e) => log_activity(&mut activity_log, LogLevel::Warning, &format!("Load text styles: {e}")),
            }
        }
    });

    let handle_create = move |_| {
        spawn(async move {
            let store = make_guest_store(role);
            match store.save_document(Document::new("Untitled", "<p></p>")).await {
                Ok(doc) => {
                    active_id.set(Some(doc.id.clone()));
                    documents.write().insert(0, doc);
                    log_activity(&mut activity_log, LogLevel::Info, "Created document");
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Create failed: {e}")),
            }
        });
    };

    let handle_save = move |request: SaveRequest| {
        let SaveRequest { document_id, content } = request;
        let Some(mut doc) = documents.peek().iter().find(|d| d.id == document_id).cloned() else {
            return;
        };
        drafts.write().insert(document_id.clone(), content.clone());
        spawn(async move {
            let title = doc.title.clone();
            doc.revise(&title, &content);
            match make_guest_store(role).save_document(doc).await {
                Ok(saved) => {
                    {
                        let mut pending = drafts.write();
                        if pending.get(&saved.id) == Some(&content) {
                            pending.remove(&saved.id);
                        }
                    }
                    if let Some(slot) = documents.write().iter_mut().find(|d| d.id == saved.id) {
                        *slot = saved;
                    }
                    log_activity(&mut activity_log, LogLevel::Success, &format!("Saved {title}"));
                }
                // The draft stays; the editor is still dirty and asks again
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Save failed: {e}")),
            }
        });
    };

    let handle_delete = move |_| {
        let Some(id) = active_id() else {
            return;
        };
        spawn(async move {
            match make_guest_store(role).delete_document(&id).await {
                Ok(()) => {
                    drafts.write().remove(&id);
                    documents.write().retain(|d| d.id != id);
                    active_id.set(documents.peek().first().map(|d| d.id.clone()));
                    log_activity(&mut activity_log, LogLevel::Info, "Deleted document");
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Delete failed: {e}")),
            }
        });
    };

    let handle_template_choice = move |evt: FormEvent| {
        let template_id = Some(evt.value()).filter(|v| !v.is_empty());
        let Some(id) = active_id() else {
            return;
        };
        let Some(mut doc) = documents.peek().iter().find(|d| d.id == id).cloned() else {
            return;
        };
        doc.template_id = template_id;
        spawn(async move {
            match make_guest_store(role).save_document(doc).await {
                Ok(saved) => {
                    if let Some(slot) = documents.write().iter_mut().find(|d| d.id == saved.id) {
                        *slot = saved;
                    }
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Template change failed: {e}")),
            }
        });
    };

    let handle_save_template = move |data: TemplateData| {
        let default_page = PageDimensions::from(&config.peek().page);
        spawn(async move {
            let data = TemplateData {
                styles: ensure_dimensions(&data.styles, &default_page),
                ..data
            };
            let store = make_guest_store(role);
            match store.save_template(data).await {
                Ok(saved) => {
                    log_activity(&mut activity_log, LogLevel::Success, &format!("Saved template {}", saved.name));
                    if let Ok(list) = store.get_templates().await {
                        templates.set(list);
                    }
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Template save failed: {e}")),
            }
        });
    };

    let handle_save_text_style = move |data: TextStyleData| {
        spawn(async move {
            let store = make_guest_store(role);
            match store.save_text_style(data).await {
                Ok(saved) => {
                    log_activity(&mut activity_log, LogLevel::Success, &format!("Saved text style {}", saved.name));
                    if let Ok(list) = store.get_text_styles().await {
                        text_styles.set(list);
                    }
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Text style save failed: {e}")),
            }
        });
    };

    let active_doc = active_id().and_then(|id| documents().into_iter().find(|d| d.id == id));
    let template_css = active_doc
        .as_ref()
        .and_then(|d| d.template_id.as_ref())
        .and_then(|tid| templates().into_iter().find(|t| &t.id == tid))
        .map(|t| t.styles)
        .unwrap_or_default();
    let text_style_css = generate_css_from_text_styles(&text_styles());
    let default_page = PageDimensions::from(&config().page);
    let template_options: Vec<(String, String, String)> = templates()
        .into_iter()
        .map(|t| (t.id.clone(), t.id, t.name))
        .collect();
    let active_draft = active_doc.as_ref().and_then(|d| drafts.read().get(&d.id).cloned());
    let chosen_template = active_doc
        .as_ref()
        .and_then(|d| d.template_id.clone())
        .unwrap_or_default();

    rsx! {
        div {
            class: "workspace",
            aside {
                class: "workspace-sidebar",
                DocumentList {
                    documents: documents(),
                    active_id: active_id(),
                    can_create: capabilities.can_edit,
                    on_select: move |id: String| active_id.set(Some(id)),
                    on_create: handle_create,
                }
            }
            main {
                class: "workspace-main",
                if let Some(doc) = active_doc {
                    div {
                        class: "document-template-choice",
                        label {
                            "Template "
                            select {
                                value: "{chosen_template}",
                                disabled: !capabilities.can_edit,
                                onchange: handle_template_choice,
                                option { value: "", "None" }
                                for (key, id, name) in template_options {
                                    option { key: "{key}", value: "{id}", "{name}" }
                                }
                            }
                        }
                    }
                    if capabilities.can_edit {
                        DocumentEditor {
                            key: "{doc.id}",
                            document: doc.clone(),
                            session: session.clone(),
                            config: config(),
                            template_css: template_css.clone(),
                            text_style_css: text_style_css.clone(),
                            draft: active_draft.clone(),
                            on_save: handle_save,
                            on_delete: handle_delete,
                        }
                    } else {
                        StaticPreview {
                            markup: doc.content.clone(),
                            template_css: template_css.clone(),
                            text_style_css: text_style_css.clone(),
                            framed: capabilities.framed_page,
                            default_page: default_page.clone(),
                        }
                    }
                } else {
                    div {
                        class: "workspace-empty",
                        h2 { "No document selected" }
                    }
                }
            }
            if capabilities.can_manage_templates {
                aside {
                    class: "workspace-templates",
                    TemplatePanel {
                        templates: templates(),
                        text_styles: text_styles(),
                        default_page,
                        on_save_template: handle_save_template,
                        on_save_text_style: handle_save_text_style,
                    }
                }
            }
        }
    }
}
