//! Compile text style presets into template CSS.

use store::TextStyle;
use tracing::warn;

use crate::template::TEMPLATE_SCOPE;

/// One rule per style, each selector scoped under `.template-styled`.
/// Only the fields a style sets become declarations.
pub fn generate_css_from_text_styles(styles: &[TextStyle]) -> String {
    let mut css = String::new();
    for style in styles {
        let selector = scoped_selector(&style.selector);
        if selector.is_empty() {
            warn!("Skipping text style '{}' with an empty selector", style.name);
            continue;
        }
        let decls = declarations(style);
        if decls.is_empty() {
            continue;
        }
        css.push_str(&selector);
        css.push_str(" {\n");
        for (prop, value) in decls {
            css.push_str(&format!("  {prop}: {value};\n"));
        }
        css.push_str("}\n");
    }
    css
}

fn scoped_selector(selector: &str) -> String {
    selector
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{TEMPLATE_SCOPE} {s}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn declarations(style: &TextStyle) -> Vec<(&'static str, String)> {
    let fields = [
        ("font-family", style.font_family.as_deref().map(quote_family)),
        ("font-size", style.font_size.clone()),
        ("font-weight", style.font_weight.clone()),
        ("color", style.color.clone()),
        ("line-height", style.line_height.clone()),
        ("margin-top", style.margin_top.clone()),
        ("margin-bottom", style.margin_bottom.clone()),
        ("text-align", style.text_align.clone()),
    ];
    fields
        .into_iter()
        .filter_map(|(prop, value)| {
            let value = value?.trim().to_string();
            (!value.is_empty()).then_some((prop, value))
        })
        .collect()
}

/// Quote a single family name containing whitespace. Lists and quoted names
/// pass through.
fn quote_family(family: &str) -> String {
    let family = family.trim();
    if family.contains(char::is_whitespace)
        && !family.contains(',')
        && !family.starts_with('"')
        && !family.starts_with('\'')
    {
        format!("\"{family}\"")
    } else {
        family.to_string()
    }
}
