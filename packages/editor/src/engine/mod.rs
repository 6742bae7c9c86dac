//! # Rich-text engine capability surface
//!
//! The editing widget is an external collaborator. Everything the formatting
//! logic needs from it is captured by [`RichTextEngine`]; the rest of the crate
//! never depends on a concrete widget.
//!
//! ## Model
//!
//! A document is a list of blocks. Each block has a [`BlockType`], an indent
//! level ([`BlockAttrs`]) and a run of styled text. Inline formatting lives in
//! [`Marks`]: the `bold` and `italic` flags plus a `textStyle` mark carrying
//! [`TextStyleAttrs`] (color, font family, font size).
//!
//! Positions are `(block, char offset)` pairs; a [`Selection`] is an anchor and
//! a head, collapsed for a plain caret.
//!
//! ## Events
//!
//! | Event | Fired | Payload |
//! |-------|-------|---------|
//! | [`EventKind::SelectionChange`] | after the selection moves and after every mutation | the `textStyle` reading at the selection |
//! | [`EventKind::ContentChange`] | after every mutation | the serialized markup |
//!
//! [`MemoryEngine`] is the in-crate reference implementation.

mod document;
pub mod html;
mod memory;

pub use document::{Block, Run};
pub use memory::MemoryEngine;

use crate::attributes::TextStyleReading;

/// Inline mark names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    TextStyle,
}

/// Block node types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockType {
    #[default]
    Paragraph,
    BulletItem,
    OrderedItem,
}

/// Attributes carried by the `textStyle` mark. `None` means "not set".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextStyleAttrs {
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
}

impl TextStyleAttrs {
    pub fn color(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn font_family(family: &str) -> Self {
        Self {
            font_family: Some(family.to_string()),
            ..Self::default()
        }
    }

    pub fn font_size(size: &str) -> Self {
        Self {
            font_size: Some(size.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.font_family.is_none() && self.font_size.is_none()
    }

    /// Overwrite the fields `patch` sets.
    pub fn merge(&mut self, patch: &TextStyleAttrs) {
        if patch.color.is_some() {
            self.color = patch.color.clone();
        }
        if patch.font_family.is_some() {
            self.font_family = patch.font_family.clone();
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size.clone();
        }
    }
}

/// The full set of inline marks on a run of text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub text_style: TextStyleAttrs,
}

impl Marks {
    pub fn has(&self, kind: MarkKind) -> bool {
        match kind {
            MarkKind::Bold => self.bold,
            MarkKind::Italic => self.italic,
            MarkKind::TextStyle => !self.text_style.is_empty(),
        }
    }

    pub fn set(&mut self, kind: MarkKind, on: bool) {
        match kind {
            MarkKind::Bold => self.bold = on,
            MarkKind::Italic => self.italic = on,
            // textStyle cannot be switched on without attributes
            MarkKind::TextStyle => {
                if !on {
                    self.text_style = TextStyleAttrs::default();
                }
            }
        }
    }
}

/// A mark with its attributes, as passed to [`RichTextEngine::apply_mark`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    TextStyle(TextStyleAttrs),
}

/// Block-level node attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockAttrs {
    pub indent: u8,
}

/// A position in the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub block: usize,
    /// Offset in chars within the block's text.
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Anchor/head selection. `anchor == head` is a caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self { anchor: at, head: at }
    }

    pub fn range(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    pub fn from(&self) -> Position {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> Position {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Events a host engine emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    SelectionChange,
    ContentChange,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    SelectionChange(TextStyleReading),
    ContentChange(String),
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::SelectionChange(_) => EventKind::SelectionChange,
            EngineEvent::ContentChange(_) => EventKind::ContentChange,
        }
    }
}

/// Handle returned by [`RichTextEngine::on`], passed back to [`RichTextEngine::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Box<dyn FnMut(&EngineEvent)>;

/// What the formatting logic needs from an editing widget.
///
/// Mutating methods act on the current selection. On a destroyed engine they
/// are no-ops.
pub trait RichTextEngine {
    /// Current selection, or None when the editor has no focus/selection.
    fn selection(&self) -> Option<Selection>;

    fn is_destroyed(&self) -> bool;

    /// Per-field reading of the `textStyle` mark across the selection.
    fn selection_attributes(&self) -> TextStyleReading;

    /// Is `kind` present on all of the selected text?
    fn is_mark_active(&self, kind: MarkKind) -> bool;

    /// Add a mark. For [`Mark::TextStyle`] only the set fields are written.
    fn apply_mark(&mut self, mark: Mark);

    /// Colored stretches of the selection, in document order. Uncolored text
    /// is left out.
    fn color_spans(&self) -> Vec<(Selection, String)>;

    /// Add a mark on `range` only. The selection does not move.
    fn apply_mark_in(&mut self, range: Selection, mark: Mark);

    /// Remove a mark entirely.
    fn unset_mark(&mut self, kind: MarkKind);

    /// Remove `kind` if it covers the whole selection, otherwise add it.
    fn toggle_mark(&mut self, kind: MarkKind);

    fn unset_all_marks(&mut self);

    /// Type of the block holding the selection head.
    fn selected_block_type(&self) -> Option<BlockType>;

    /// Switch the selected blocks to `block_type`, or back to paragraphs when
    /// they all already are.
    fn toggle_block(&mut self, block_type: BlockType);

    /// Attributes of the block holding the selection head, if it is a `block_type`.
    fn block_attributes(&self, block_type: BlockType) -> Option<BlockAttrs>;

    /// Rewrite the attributes of every selected block of `block_type`.
    fn update_block_attributes(&mut self, block_type: BlockType, update: &mut dyn FnMut(&mut BlockAttrs));

    /// Replace the whole document with parsed markup.
    fn set_content(&mut self, markup: &str);

    fn serialize(&self) -> String;

    fn on(&mut self, kind: EventKind, handler: Listener) -> ListenerId;

    /// Returns false when the listener was not registered.
    fn off(&mut self, id: ListenerId) -> bool;
}

impl<E: RichTextEngine + ?Sized> RichTextEngine for &mut E {
    fn selection(&self) -> Option<Selection> {
        (**self).selection()
    }

    fn is_destroyed(&self) -> bool {
        (**self).is_destroyed()
    }

    fn selection_attributes(&self) -> TextStyleReading {
        (**self).selection_attributes()
    }

    fn is_mark_active(&self, kind: MarkKind) -> bool {
        (**self).is_mark_active(kind)
    }

    fn apply_mark(&mut self, mark: Mark) {
        (**self).apply_mark(mark)
    }

    fn color_spans(&self) -> Vec<(Selection, String)> {
        (**self).color_spans()
    }

    fn apply_mark_in(&mut self, range: Selection, mark: Mark) {
        (**self).apply_mark_in(range, mark)
    }

    fn unset_mark(&mut self, kind: MarkKind) {
        (**self).unset_mark(kind)
    }

    fn toggle_mark(&mut self, kind: MarkKind) {
        (**self).toggle_mark(kind)
    }

    fn unset_all_marks(&mut self) {
        (**self).unset_all_marks()
    }

    fn selected_block_type(&self) -> Option<BlockType> {
        (**self).selected_block_type()
    }

    fn toggle_block(&mut self, block_type: BlockType) {
        (**self).toggle_block(block_type)
    }

    fn block_attributes(&self, block_type: BlockType) -> Option<BlockAttrs> {
        (**self).block_attributes(block_type)
    }

    fn update_block_attributes(&mut self, block_type: BlockType, update: &mut dyn FnMut(&mut BlockAttrs)) {
        (**self).update_block_attributes(block_type, update)
    }

    fn set_content(&mut self, markup: &str) {
        (**self).set_content(markup)
    }

    fn serialize(&self) -> String {
        (**self).serialize()
    }

    fn on(&mut self, kind: EventKind, handler: Listener) -> ListenerId {
        (**self).on(kind, handler)
    }

    fn off(&mut self, id: ListenerId) -> bool {
        (**self).off(id)
    }
}
