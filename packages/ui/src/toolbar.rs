use dioxus::prelude::*;
use editor::{ActiveAttributes, FormattingToggle, ToolbarVariant};

use crate::icons::{FaBold, FaEraser, FaIndent, FaItalic, FaListOl, FaListUl, FaOutdent};
use crate::Icon;

const FONT_FAMILIES: [&str; 5] = ["Inter", "Georgia", "Lato", "Courier New", "Playfair Display"];
const FONT_SIZES: [&str; 7] = ["12px", "14px", "16px", "18px", "20px", "24px", "32px"];

fn toggle_icon(toggle: FormattingToggle) -> Element {
    match toggle {
        FormattingToggle::Bold => rsx! { Icon { icon: FaBold, width: 14, height: 14 } },
        FormattingToggle::Italic => rsx! { Icon { icon: FaItalic, width: 14, height: 14 } },
        FormattingToggle::BulletList => rsx! { Icon { icon: FaListUl, width: 14, height: 14 } },
        FormattingToggle::OrderedList => rsx! { Icon { icon: FaListOl, width: 14, height: 14 } },
        FormattingToggle::Indent => rsx! { Icon { icon: FaIndent, width: 14, height: 14 } },
        FormattingToggle::Outdent => rsx! { Icon { icon: FaOutdent, width: 14, height: 14 } },
        FormattingToggle::ClearFormatting => rsx! { Icon { icon: FaEraser, width: 14, height: 14 } },
    }
}

/// Formatting toolbar. Renders nothing for [`ToolbarVariant::Hidden`].
#[component]
pub fn Toolbar(
    variant: ToolbarVariant,
    attributes: ActiveAttributes,
    /// Toggles currently shown as pressed.
    active: Vec<FormattingToggle>,
    /// The selection spans more than one color.
    #[props(default)]
    color_ambiguous: bool,
    on_toggle: EventHandler<FormattingToggle>,
    on_color: EventHandler<String>,
    on_font_family: EventHandler<String>,
    on_font_size: EventHandler<String>,
) -> Element {
    if variant == ToolbarVariant::Hidden {
        return rsx! {};
    }
    let toggles: Vec<(FormattingToggle, &'static str)> = FormattingToggle::ALL
        .into_iter()
        .filter(|t| variant == ToolbarVariant::Full || t.in_compact_toolbar())
        .map(|t| (t, t.label()))
        .collect();

    rsx! {
        div {
            class: if variant == ToolbarVariant::Compact { "toolbar compact" } else { "toolbar" },
            for (toggle, label) in toggles {
                button {
                    key: "{label}",
                    class: if active.contains(&toggle) { "toolbar-button active" } else { "toolbar-button" },
                    title: label,
                    onclick: move |_| on_toggle.call(toggle),
                    {toggle_icon(toggle)}
                }
            }
            span { class: "toolbar-separator" }
            select {
                class: "toolbar-select",
                title: "Font",
                value: "{attributes.font_family}",
                onchange: move |evt| on_font_family.call(evt.value()),
                for family in FONT_FAMILIES {
                    option { key: "{family}", value: family, "{family}" }
                }
            }
            select {
                class: "toolbar-select",
                title: "Size",
                value: "{attributes.font_size}",
                onchange: move |evt| on_font_size.call(evt.value()),
                for size in FONT_SIZES {
                    option { key: "{size}", value: size, "{size}" }
                }
            }
            input {
                class: if color_ambiguous { "toolbar-color ambiguous" } else { "toolbar-color" },
                r#type: "color",
                title: if color_ambiguous { "Mixed colors" } else { "Text color" },
                value: "{attributes.font_color}",
                onchange: move |evt| on_color.call(evt.value()),
            }
        }
    }
}
