//! # Template page dimensions
//!
//! A template's `styles` string carries its page size as a dedicated rule:
//!
//! ```css
//! .template-styled {
//!   width: 6in;
//!   height: 9in;
//!   min-height: 9in;
//! }
//! ```
//!
//! [`apply_dimensions`] replaces any earlier copy of that rule and
//! [`extract_dimensions_from_css`] reads it back. `min-height` and `max-width`
//! declarations never count as the height or width.

use std::sync::OnceLock;

use regex::Regex;
use store::config::PageConfig;

/// Class every styled page carries.
pub const TEMPLATE_SCOPE: &str = ".template-styled";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDimensions {
    pub width: String,
    pub height: String,
}

impl PageDimensions {
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self::from(&PageConfig::default())
    }
}

impl From<&PageConfig> for PageDimensions {
    fn from(page: &PageConfig) -> Self {
        Self::new(page.width.clone(), page.height.clone())
    }
}

fn scope_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\.template-styled\s*\{([^}]*)\}").unwrap())
}

fn width_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[\s;])width\s*:\s*([^;]+?)\s*(?:;|$)").unwrap())
}

fn height_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[\s;])height\s*:\s*([^;]+?)\s*(?:;|$)").unwrap())
}

fn dimensions_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\.template-styled\s*\{\s*width:[^;{}]*;\s*height:[^;{}]*;\s*min-height:[^;{}]*;\s*\}\s*",
        )
        .unwrap()
    })
}

/// The dimensions rule for a page of `width` by `height`.
pub fn generate_dimensions_css(width: &str, height: &str) -> String {
    format!(
        "{TEMPLATE_SCOPE} {{\n  width: {width};\n  height: {height};\n  min-height: {height};\n}}\n"
    )
}

/// Page size declared in a template's CSS. The last `.template-styled` rule
/// declaring both a width and a height wins.
pub fn extract_dimensions_from_css(css: &str) -> Option<PageDimensions> {
    scope_rule()
        .captures_iter(css)
        .filter_map(|caps| {
            let body = caps.get(1)?.as_str();
            let width = width_decl().captures(body)?.get(1)?.as_str().trim();
            let height = height_decl().captures(body)?.get(1)?.as_str().trim();
            Some(PageDimensions::new(width, height))
        })
        .last()
}

/// Replace the dimensions rule in `styles` with one for `width` by `height`.
pub fn apply_dimensions(styles: &str, width: &str, height: &str) -> String {
    let mut rest = dimensions_rule().replace_all(styles, "").trim_end().to_string();
    if !rest.is_empty() {
        rest.push_str("\n\n");
    }
    rest.push_str(&generate_dimensions_css(width, height));
    rest
}

/// Dimensions for rendering: whatever the CSS declares, else `default`.
pub fn dimensions_or_default(css: &str, default: &PageDimensions) -> PageDimensions {
    extract_dimensions_from_css(css).unwrap_or_else(|| default.clone())
}

/// Append a dimensions rule when `styles` has none. Used when saving a template.
pub fn ensure_dimensions(styles: &str, dims: &PageDimensions) -> String {
    if extract_dimensions_from_css(styles).is_some() {
        styles.to_string()
    } else {
        apply_dimensions(styles, &dims.width, &dims.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_extract_roundtrip() {
        let styles = apply_dimensions("", "6in", "9in");
        assert_eq!(
            extract_dimensions_from_css(&styles),
            Some(PageDimensions::new("6in", "9in"))
        );
    }

    #[test]
    fn test_apply_replaces_previous_rule() {
        let base = "h1 { color: red; }\n";
        let once = apply_dimensions(base, "8.5in", "11in");
        let twice = apply_dimensions(&once, "210mm", "297mm");
        assert_eq!(twice.matches("min-height").count(), 1);
        assert!(twice.starts_with("h1 { color: red; }"));
        assert_eq!(
            extract_dimensions_from_css(&twice),
            Some(PageDimensions::new("210mm", "297mm"))
        );
    }

    #[test]
    fn test_min_and_max_declarations_do_not_match() {
        let css = ".template-styled { max-width: 5in; min-height: 2in; }";
        assert_eq!(extract_dimensions_from_css(css), None);

        let css = ".template-styled { min-height: 2in; height: 7in; max-width: 1in; width: 4in }";
        assert_eq!(extract_dimensions_from_css(css), Some(PageDimensions::new("4in", "7in")));
    }

    #[test]
    fn test_missing_rule_falls_back() {
        let dims = dimensions_or_default("p { margin: 0; }", &PageDimensions::default());
        assert_eq!(dims, PageDimensions::new("8.5in", "11in"));
    }

    #[test]
    fn test_ensure_dimensions() {
        let dims = PageDimensions::new("5in", "7in");
        let styles = ensure_dimensions("p { margin: 0; }", &dims);
        assert_eq!(extract_dimensions_from_css(&styles), Some(dims.clone()));
        // Existing rule is left alone
        let kept = apply_dimensions("", "6in", "9in");
        assert_eq!(ensure_dimensions(&kept, &dims), kept);
    }
}
