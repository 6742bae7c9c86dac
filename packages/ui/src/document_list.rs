use dioxus::prelude::*;
use store::Document;

use crate::icons::FaPlus;
use crate::Icon;

#[component]
pub fn DocumentList(
    documents: Vec<Document>,
    active_id: Option<String>,
    #[props(default = true)] can_create: bool,
    on_select: EventHandler<String>,
    on_create: EventHandler<()>,
) -> Element {
    let rows: Vec<(String, String, String, bool)> = documents
        .iter()
        .map(|d| {
            let title = if d.title.trim().is_empty() {
                "Untitled".to_string()
            } else {
                d.title.clone()
            };
            (d.id.clone(), d.id.clone(), title, active_id.as_ref() == Some(&d.id))
        })
        .collect();
    let empty = rows.is_empty();

    rsx! {
        div {
            class: "document-list",
            div {
                class: "document-list-header",
                span { "Documents" }
                if can_create {
                    button {
                        class: "icon-button",
                        title: "New document",
                        onclick: move |_| on_create.call(()),
                        Icon { icon: FaPlus, width: 12, height: 12 }
                    }
                }
            }
            if empty {
                p { class: "document-list-empty", "No documents yet" }
            }
            for (key, id, title, is_active) in rows {
                div {
                    key: "{key}",
                    class: if is_active { "document-item active" } else { "document-item" },
                    onclick: move |_| on_select.call(id.clone()),
                    "{title}"
                }
            }
        }
    }
}
