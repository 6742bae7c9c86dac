//! # Formatting commands
//!
//! [`FormattingExecutor::apply`] runs one toolbar toggle against an engine.
//!
//! Some engines rebuild the mark set when bold, italic or a list type is
//! toggled and lose the inline color on the affected text in the process. The
//! executor therefore works in three steps, all inside one `&mut` borrow of the
//! engine:
//!
//! 1. snapshot the color at the selection (the attribute store's color when the
//!    selection carries none);
//! 2. run the structural toggle;
//! 3. re-apply the snapshot as a separate mark write, unless it is the
//!    document's default color (re-asserting black would pin an inline
//!    override where the text should inherit).
//!
//! A mixed-color selection has no single value to snapshot. Its colored
//! stretches are recorded one by one and each is re-applied on its own range.
//!
//! Indentation is bounded by [`MAX_INDENT`] whatever the configuration asks for.

use store::FolioConfig;
use tracing::debug;

use crate::attributes::{normalize_color, AttrReading, AttributeField, AttributeStore};
use crate::engine::{BlockType, Mark, MarkKind, RichTextEngine, Selection, TextStyleAttrs};

/// Deepest indent level a block can reach.
pub const MAX_INDENT: u8 = 10;

/// A toolbar command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormattingToggle {
    Bold,
    Italic,
    BulletList,
    OrderedList,
    Indent,
    Outdent,
    ClearFormatting,
}

impl FormattingToggle {
    pub const ALL: [FormattingToggle; 7] = [
        FormattingToggle::Bold,
        FormattingToggle::Italic,
        FormattingToggle::BulletList,
        FormattingToggle::OrderedList,
        FormattingToggle::Indent,
        FormattingToggle::Outdent,
        FormattingToggle::ClearFormatting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormattingToggle::Bold => "Bold",
            FormattingToggle::Italic => "Italic",
            FormattingToggle::BulletList => "Bullet list",
            FormattingToggle::OrderedList => "Numbered list",
            FormattingToggle::Indent => "Indent",
            FormattingToggle::Outdent => "Outdent",
            FormattingToggle::ClearFormatting => "Clear formatting",
        }
    }

    /// Toggles kept on the compact toolbar.
    pub fn in_compact_toolbar(&self) -> bool {
        matches!(
            self,
            FormattingToggle::Bold | FormattingToggle::Italic | FormattingToggle::ClearFormatting
        )
    }
}

/// What [`FormattingExecutor::apply`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// No selection or no live engine.
    Skipped,
    Done,
    /// Every inline mark was removed; the caller should reset its attribute store.
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattingExecutor {
    default_color: String,
    max_indent: u8,
}

impl Default for FormattingExecutor {
    fn default() -> Self {
        Self::from_config(&FolioConfig::default())
    }
}

impl FormattingExecutor {
    pub fn new(default_color: &str, max_indent: u8) -> Self {
        Self {
            default_color: normalize_color(default_color),
            max_indent: max_indent.min(MAX_INDENT),
        }
    }

    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(&config.attributes.color, config.editing.max_indent)
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    pub fn max_indent(&self) -> u8 {
        self.max_indent
    }

    /// Run `toggle` on the engine's current selection.
    pub fn apply<E: RichTextEngine>(
        &self,
        engine: &mut E,
        toggle: FormattingToggle,
        attributes: &AttributeStore,
    ) -> Applied {
        if engine.is_destroyed() || engine.selection().is_none() {
            debug!("Skipping {:?}: no active selection", toggle);
            return Applied::Skipped;
        }

        match toggle {
            FormattingToggle::Bold => {
                self.preserving_color(engine, attributes, |e| e.toggle_mark(MarkKind::Bold))
            }
            FormattingToggle::Italic => {
                self.preserving_color(engine, attributes, |e| e.toggle_mark(MarkKind::Italic))
            }
            FormattingToggle::BulletList => {
                self.preserving_color(engine, attributes, |e| e.toggle_block(BlockType::BulletItem))
            }
            FormattingToggle::OrderedList => {
                self.preserving_color(engine, attributes, |e| e.toggle_block(BlockType::OrderedItem))
            }
            FormattingToggle::Indent => self.shift_indent(engine, true),
            FormattingToggle::Outdent => self.shift_indent(engine, false),
            FormattingToggle::ClearFormatting => {
                engine.unset_all_marks();
                debug!("Cleared inline formatting");
                return Applied::Cleared;
            }
        }
        Applied::Done
    }

    /// Write `color` back onto the selection unless it is empty or the default.
    /// Returns whether a mark was written.
    pub fn reassert_color<E: RichTextEngine>(&self, engine: &mut E, color: &str) -> bool {
        match self.explicit_color(color) {
            Some(color) => {
                engine.apply_mark(Mark::TextStyle(TextStyleAttrs::color(&color)));
                true
            }
            None => false,
        }
    }

    fn explicit_color(&self, color: &str) -> Option<String> {
        let color = normalize_color(color);
        (!color.is_empty() && color != self.default_color).then_some(color)
    }

    fn snapshot_color<E: RichTextEngine>(&self, engine: &E, attributes: &AttributeStore) -> ColorSnapshot {
        match engine.selection_attributes().color {
            AttrReading::Uniform(color) => ColorSnapshot::Whole(color),
            AttrReading::Absent if !attributes.is_ambiguous(AttributeField::FontColor) => {
                ColorSnapshot::Whole(attributes.get().font_color.clone())
            }
            AttrReading::Absent => ColorSnapshot::Nothing,
            AttrReading::Mixed => ColorSnapshot::Spans(engine.color_spans()),
        }
    }

    fn preserving_color<E: RichTextEngine>(
        &self,
        engine: &mut E,
        attributes: &AttributeStore,
        toggle: impl FnOnce(&mut E),
    ) {
        let snapshot = self.snapshot_color(engine, attributes);
        toggle(engine);
        match snapshot {
            ColorSnapshot::Whole(color) => {
                if self.reassert_color(engine, &color) {
                    debug!("Re-applied color {} after toggle", color);
                }
            }
            ColorSnapshot::Spans(spans) => {
                let mut restored = 0;
                for (range, color) in spans {
                    if let Some(color) = self.explicit_color(&color) {
                        engine.apply_mark_in(range, Mark::TextStyle(TextStyleAttrs::color(&color)));
                        restored += 1;
                    }
                }
                debug!("Re-applied {} color spans after toggle", restored);
            }
            ColorSnapshot::Nothing => {}
        }
    }

    fn shift_indent<E: RichTextEngine>(&self, engine: &mut E, deeper: bool) {
        let Some(block_type) = engine.selected_block_type() else {
            return;
        };
        let max = self.max_indent;
        engine.update_block_attributes(block_type, &mut |attrs| {
            attrs.indent = if deeper {
                attrs.indent.saturating_add(1).min(max)
            } else {
                attrs.indent.saturating_sub(1).min(max)
            };
        });
    }
}

/// Color state captured before a structural toggle.
enum ColorSnapshot {
    Whole(String),
    Spans(Vec<(Selection, String)>),
    Nothing,
}
