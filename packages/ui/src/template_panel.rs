use dioxus::prelude::*;
use editor::{apply_dimensions, dimensions_or_default, generate_css_from_text_styles, PageDimensions};
use store::{Template, TemplateData, TextStyle, TextStyleData};

/// Template and text style management for designers and admins.
#[component]
pub fn TemplatePanel(
    templates: Vec<Template>,
    text_styles: Vec<TextStyle>,
    default_page: PageDimensions,
    on_save_template: EventHandler<TemplateData>,
    on_save_text_style: EventHandler<TextStyleData>,
) -> Element {
    let mut selected = use_signal(|| Option::<String>::None);
    let current = selected().and_then(|id| templates.iter().find(|t| t.id == id).cloned());
    let current_id = current.as_ref().map(|t| t.id.clone());
    let form_key = current_id.clone().unwrap_or_else(|| "new".to_string());
    let entries: Vec<(String, String, String, bool)> = templates
        .iter()
        .map(|t| (t.id.clone(), t.id.clone(), t.name.clone(), current_id.as_ref() == Some(&t.id)))
        .collect();
    let style_css = generate_css_from_text_styles(&text_styles);

    rsx! {
        div {
            class: "template-panel",
            h3 { "Templates" }
            ul {
                class: "template-list",
                for (key, id, name, is_active) in entries {
                    li {
                        key: "{key}",
                        class: if is_active { "active" } else { "" },
                        onclick: move |_| selected.set(Some(id.clone())),
                        "{name}"
                    }
                }
            }
            TemplateForm {
                key: "{form_key}",
                template: current.clone(),
                default_page: default_page.clone(),
                on_save: on_save_template,
            }

            h3 { "Text styles" }
            TextStyleForm { on_save: on_save_text_style }
            pre {
                class: "text-style-css",
                "{style_css}"
            }
        }
    }
}

#[component]
fn TemplateForm(
    template: Option<Template>,
    default_page: PageDimensions,
    on_save: EventHandler<TemplateData>,
) -> Element {
    let initial = template.clone();
    let styles = initial.as_ref().map(|t| t.styles.clone()).unwrap_or_default();
    let dims = dimensions_or_default(&styles, &default_page);

    let mut name = use_signal(|| initial.as_ref().map(|t| t.name.clone()).unwrap_or_default());
    let mut width = use_signal(|| dims.width.clone());
    let mut height = use_signal(|| dims.height.clone());

    let handle_save = move |_| {
        let n = name().trim().to_string();
        if n.is_empty() {
            return;
        }
        on_save.call(TemplateData {
            id: template.as_ref().map(|t| t.id.clone()),
            name: n,
            styles: apply_dimensions(&styles, width().trim(), height().trim()),
        });
    };

    rsx! {
        div {
            class: "template-form",
            input {
                r#type: "text",
                placeholder: "Template name",
                value: name(),
                oninput: move |evt: FormEvent| name.set(evt.value()),
            }
            label {
                "Width "
                input {
                    r#type: "text",
                    value: width(),
                    oninput: move |evt: FormEvent| width.set(evt.value()),
                }
            }
            label {
                "Height "
                input {
                    r#type: "text",
                    value: height(),
                    oninput: move |evt: FormEvent| height.set(evt.value()),
                }
            }
            button { onclick: handle_save, "Apply" }
        }
    }
}

#[component]
fn TextStyleForm(on_save: EventHandler<TextStyleData>) -> Element {
    let mut name = use_signal(String::new);
    let mut selector = use_signal(String::new);
    let mut font_size = use_signal(String::new);
    let mut color = use_signal(String::new);

    let non_empty = |v: String| {
        let v = v.trim().to_string();
        (!v.is_empty()).then_some(v)
    };

    let handle_save = move |_| {
        if name().trim().is_empty() || selector().trim().is_empty() {
            return;
        }
        on_save.call(TextStyleData {
            name: name().trim().to_string(),
            selector: selector().trim().to_string(),
            font_size: non_empty(font_size()),
            color: non_empty(color()),
            ..TextStyleData::default()
        });
        name.set(String::new());
        selector.set(String::new());
    };

    rsx! {
        div {
            class: "text-style-form",
            input {
                r#type: "text",
                placeholder: "Name",
                value: name(),
                oninput: move |evt: FormEvent| name.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Selector, e.g. h1",
                value: selector(),
                oninput: move |evt: FormEvent| selector.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Font size",
                value: font_size(),
                oninput: move |evt: FormEvent| font_size.set(evt.value()),
            }
            input {
                r#type: "text",
                placeholder: "Color",
                value: color(),
                oninput: move |evt: FormEvent| color.set(evt.value()),
            }
            button { onclick: handle_save, "Add style" }
        }
    }
}
