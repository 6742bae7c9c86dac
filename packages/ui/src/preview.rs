use dioxus::prelude::*;
use editor::{dimensions_or_default, ContentSynchronizer, PageDimensions, SurfaceMode};

/// Read-only page rendering of a document with its template applied.
#[component]
pub fn StaticPreview(
    markup: String,
    /// Template CSS, including its `.template-styled` dimensions rule.
    #[props(default)]
    template_css: String,
    /// CSS compiled from the text style presets.
    #[props(default)]
    text_style_css: String,
    #[props(default = true)]
    framed: bool,
    #[props(default)]
    default_page: PageDimensions,
) -> Element {
    let html = ContentSynchronizer::render(&markup, SurfaceMode::Static).markup().to_string();
    let page = dimensions_or_default(&template_css, &default_page);

    rsx! {
        style { "{template_css}\n{text_style_css}" }
        div {
            class: if framed { "page-frame framed" } else { "page-frame" },
            div {
                class: "template-styled static-preview",
                style: "width: {page.width}; min-height: {page.height};",
                dangerous_inner_html: "{html}",
            }
        }
    }
}
