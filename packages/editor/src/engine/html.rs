//! # Markup codec for the in-memory engine
//!
//! [`serialize`] writes blocks as the HTML subset the preview renders:
//!
//! ```html
//! <p data-indent="1"><span style="color: #ff0000"><strong>Hi</strong></span></p>
//! <ul><li><p>item</p></li></ul>
//! ```
//!
//! [`parse`] reads that subset back, and tolerates what pasted markup tends to
//! contain: `<b>`/`<i>` aliases, headings and `<div>`s (read as paragraphs),
//! `<br>` (splits the block), comments, and unknown tags (ignored, text kept).

use super::{Block, BlockType, Marks, Run, TextStyleAttrs};

/// Serialize blocks to markup. An empty document is `<p></p>`.
pub fn serialize(blocks: &[Block]) -> String {
    if blocks.is_empty() {
        return "<p></p>".to_string();
    }
    let mut out = String::new();
    let mut open_list: Option<BlockType> = None;

    for block in blocks {
        if open_list.is_some() && open_list != Some(block.kind) {
            close_list(&mut out, open_list.take());
        }
        match block.kind {
            BlockType::Paragraph => {
                out.push_str("<p");
                push_indent(&mut out, block.attrs.indent);
                out.push('>');
                push_runs(&mut out, &block.runs);
                out.push_str("</p>");
            }
            BlockType::BulletItem | BlockType::OrderedItem => {
                if open_list.is_none() {
                    out.push_str(if block.kind == BlockType::BulletItem { "<ul>" } else { "<ol>" });
                    open_list = Some(block.kind);
                }
                out.push_str("<li");
                push_indent(&mut out, block.attrs.indent);
                out.push_str("><p>");
                push_runs(&mut out, &block.runs);
                out.push_str("</p></li>");
            }
        }
    }
    close_list(&mut out, open_list);
    out
}

fn close_list(out: &mut String, list: Option<BlockType>) {
    match list {
        Some(BlockType::BulletItem) => out.push_str("</ul>"),
        Some(BlockType::OrderedItem) => out.push_str("</ol>"),
        _ => {}
    }
}

fn push_indent(out: &mut String, indent: u8) {
    if indent > 0 {
        out.push_str(&format!(" data-indent=\"{indent}\""));
    }
}

fn push_runs(out: &mut String, runs: &[Run]) {
    for run in runs {
        let style = style_attribute(&run.marks.text_style);
        if let Some(style) = &style {
            out.push_str(&format!("<span style=\"{}\">", escape(style)));
        }
        if run.marks.bold {
            out.push_str("<strong>");
        }
        if run.marks.italic {
            out.push_str("<em>");
        }
        out.push_str(&escape(&run.text));
        if run.marks.italic {
            out.push_str("</em>");
        }
        if run.marks.bold {
            out.push_str("</strong>");
        }
        if style.is_some() {
            out.push_str("</span>");
        }
    }
}

fn style_attribute(attrs: &TextStyleAttrs) -> Option<String> {
    let mut decls = Vec::new();
    if let Some(color) = &attrs.color {
        decls.push(format!("color: {color}"));
    }
    if let Some(family) = &attrs.font_family {
        decls.push(format!("font-family: {family}"));
    }
    if let Some(size) = &attrs.font_size {
        decls.push(format!("font-size: {size}"));
    }
    if decls.is_empty() {
        None
    } else {
        Some(decls.join("; "))
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Decode the entities [`escape`] produces plus numeric references and `&nbsp;`.
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let name = &rest[1..semi];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// One inline element on the open-tag stack.
struct InlineFrame {
    tag: String,
    bold: bool,
    italic: bool,
    style: TextStyleAttrs,
}

struct Parser {
    blocks: Vec<Block>,
    current: Option<Block>,
    lists: Vec<BlockType>,
    item_indent: Option<u8>,
    inline: Vec<InlineFrame>,
}

impl Parser {
    fn marks(&self) -> Marks {
        let mut marks = Marks::default();
        for frame in &self.inline {
            marks.bold |= frame.bold;
            marks.italic |= frame.italic;
            marks.text_style.merge(&frame.style);
        }
        marks
    }

    fn block_kind(&self) -> BlockType {
        self.lists.last().copied().unwrap_or(BlockType::Paragraph)
    }

    fn start_block(&mut self, indent: Option<u8>) {
        self.finish_block();
        let mut block = Block::new(self.block_kind());
        block.attrs.indent = indent.or(self.item_indent).unwrap_or(0);
        self.current = Some(block);
    }

    fn finish_block(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.normalize();
            self.blocks.push(block);
        }
    }

    fn text(&mut self, raw: &str) {
        if self.current.is_none() {
            if raw.trim().is_empty() {
                return;
            }
            self.start_block(None);
        }
        let marks = self.marks();
        if let Some(block) = self.current.as_mut() {
            block.runs.push(Run::new(unescape(raw), marks));
        }
    }

    fn open(&mut self, name: &str, attrs: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "div" | "blockquote" | "pre" => {
                self.start_block(attr_value(attrs, "data-indent").and_then(|v| v.parse().ok()));
            }
            "ul" | "ol" => {
                self.finish_block();
                self.lists.push(if name == "ul" { BlockType::BulletItem } else { BlockType::OrderedItem });
            }
            "li" => {
                self.finish_block();
                self.item_indent = attr_value(attrs, "data-indent").and_then(|v| v.parse().ok());
            }
            "br" => {
                let indent = self.current.as_ref().map(|b| b.attrs.indent);
                self.start_block(indent);
            }
            "hr" => self.finish_block(),
            "img" => {}
            _ => {
                let style = attr_value(attrs, "style")
                    .map(|s| parse_style(&s))
                    .unwrap_or_default();
                self.inline.push(InlineFrame {
                    tag: name.to_string(),
                    bold: matches!(name, "strong" | "b"),
                    italic: matches!(name, "em" | "i"),
                    style,
                });
            }
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "div" | "blockquote" | "pre" => {
                self.finish_block();
            }
            "ul" | "ol" => {
                self.finish_block();
                self.lists.pop();
            }
            "li" => {
                self.finish_block();
                self.item_indent = None;
            }
            _ => {
                if let Some(idx) = self.inline.iter().rposition(|f| f.tag == name) {
                    self.inline.truncate(idx);
                }
            }
        }
    }
}

/// Parse markup into blocks. Never fails; the result has at least one block.
pub fn parse(markup: &str) -> Vec<Block> {
    let mut parser = Parser {
        blocks: Vec::new(),
        current: None,
        lists: Vec::new(),
        item_indent: None,
        inline: Vec::new(),
    };

    let mut rest = markup;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|end| &after[end + 3..]).unwrap_or("");
            continue;
        }
        if rest.starts_with('<') {
            let Some(end) = rest.find('>') else {
                parser.text(rest);
                break;
            };
            let tag = &rest[1..end];
            rest = &rest[end + 1..];
            if let Some(name) = tag.strip_prefix('/') {
                parser.close(&name.trim().to_ascii_lowercase());
            } else {
                let self_closing = tag.ends_with('/');
                let tag = tag.trim_end_matches('/');
                let (name, attrs) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
                let name = name.to_ascii_lowercase();
                parser.open(&name, attrs);
                if self_closing {
                    parser.close(&name);
                }
            }
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            parser.text(&rest[..end]);
            rest = &rest[end..];
        }
    }
    parser.finish_block();

    if parser.blocks.is_empty() {
        parser.blocks.push(Block::new(BlockType::Paragraph));
    }
    parser.blocks
}

/// Value of `name="..."` (or single-quoted) in a raw attribute string.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    while let Some(idx) = rest.find(name) {
        let before_ok = idx == 0 || rest[..idx].ends_with(char::is_whitespace);
        let after = rest[idx + name.len()..].trim_start();
        if before_ok {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next()?;
                if quote == '"' || quote == '\'' {
                    let inner = &value[1..];
                    let close = inner.find(quote)?;
                    return Some(unescape(&inner[..close]));
                }
                let end = value.find(char::is_whitespace).unwrap_or(value.len());
                return Some(unescape(&value[..end]));
            }
        }
        rest = &rest[idx + name.len()..];
    }
    None
}

/// Read the declarations the `textStyle` mark carries from a `style` attribute.
fn parse_style(style: &str) -> TextStyleAttrs {
    let mut attrs = TextStyleAttrs::default();
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => attrs.color = Some(value.to_string()),
            "font-family" => attrs.font_family = Some(value.to_string()),
            "font-size" => attrs.font_size = Some(value.to_string()),
            _ => {}
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        assert_eq!(serialize(&[]), "<p></p>");
        let blocks = parse("");
        assert_eq!(blocks.len(), 1);
        assert_eq!(serialize(&blocks), "<p></p>");
    }

    #[test]
    fn test_styled_runs() {
        let markup = "<p>plain <span style=\"color: #ff0000\"><strong>red bold</strong></span></p>";
        let blocks = parse(markup);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs.len(), 2);
        let styled = &blocks[0].runs[1];
        assert!(styled.marks.bold);
        assert_eq!(styled.marks.text_style.color.as_deref(), Some("#ff0000"));
        assert_eq!(serialize(&blocks), markup);
    }

    #[test]
    fn test_lists_and_indent() {
        let markup = "<ul><li><p>one</p></li><li data-indent=\"2\"><p>two</p></li></ul>\
                      <ol><li><p>three</p></li></ol><p data-indent=\"1\">after</p>";
        let blocks = parse(markup);
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].kind, BlockType::BulletItem);
        assert_eq!(blocks[1].attrs.indent, 2);
        assert_eq!(blocks[2].kind, BlockType::OrderedItem);
        assert_eq!(blocks[3].kind, BlockType::Paragraph);
        assert_eq!(blocks[3].attrs.indent, 1);
        assert_eq!(serialize(&blocks), markup);
    }

    #[test]
    fn test_escaping_roundtrip() {
        let blocks = vec![Block::paragraph("a < b & \"c\"")];
        let markup = serialize(&blocks);
        assert_eq!(markup, "<p>a &lt; b &amp; &quot;c&quot;</p>");
        assert_eq!(parse(&markup), blocks);
    }

    #[test]
    fn test_tolerates_pasted_markup() {
        let blocks = parse("<!-- x --><h1>Title</h1><div><b>B</b><i>I</i><a href=\"#\">link</a></div>text<br/>more");
        let texts: Vec<String> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["Title", "BIlink", "text", "more"]);
        assert!(blocks[1].runs[0].marks.bold);
        assert!(blocks[1].runs[1].marks.italic);
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(unescape("&#65;&#x42;&nbsp;&bogus;"), "AB\u{a0}&bogus;");
    }

    #[test]
    fn test_style_with_single_quotes() {
        let blocks = parse("<p><span style='font-family: Lato; font-size: 12px'>x</span></p>");
        let style = &blocks[0].runs[0].marks.text_style;
        assert_eq!(style.font_family.as_deref(), Some("Lato"));
        assert_eq!(style.font_size.as_deref(), Some("12px"));
        assert!(style.color.is_none());
    }
}
