use super::html;
use super::{
    Block, BlockAttrs, BlockType, EngineEvent, EventKind, Listener, ListenerId, Mark, MarkKind, Marks, Position,
    RichTextEngine, Run, Selection,
};
use crate::attributes::{AttrReading, TextStyleReading};

struct Registered {
    id: ListenerId,
    kind: EventKind,
    handler: Listener,
}

/// In-memory [`RichTextEngine`].
///
/// Behaves like a browser editing widget as far as marks, blocks and events
/// go: a caret carries "stored marks" that apply to the next inserted text,
/// range operations split and merge runs, and every mutation fires a content
/// change followed by a selection change.
///
/// [`MemoryEngine::with_color_reset`] builds an engine that drops the
/// `textStyle` color whenever bold or italic is toggled, the way some hosts do
/// when they rebuild the mark set.
pub struct MemoryEngine {
    blocks: Vec<Block>,
    selection: Option<Selection>,
    stored_marks: Option<Marks>,
    destroyed: bool,
    color_reset: bool,
    listeners: Vec<Registered>,
    next_listener: u64,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockType::Paragraph)],
            selection: None,
            stored_marks: None,
            destroyed: false,
            color_reset: false,
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    pub fn from_markup(markup: &str) -> Self {
        let mut engine = Self::new();
        engine.blocks = html::parse(markup);
        engine
    }

    /// Toggling bold or italic also clears the color on the affected text.
    pub fn with_color_reset(mut self) -> Self {
        self.color_reset = true;
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Move the selection. Positions are clamped to the document.
    pub fn set_selection(&mut self, selection: Selection) {
        if self.destroyed {
            return;
        }
        self.selection = Some(Selection::range(self.clamp(selection.anchor), self.clamp(selection.head)));
        self.stored_marks = None;
        self.emit_selection();
    }

    /// Select the whole document.
    pub fn select_all(&mut self) {
        let last = self.blocks.len() - 1;
        let end = Position::new(last, self.blocks[last].char_len());
        self.set_selection(Selection::range(Position::default(), end));
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.selection = None;
        self.stored_marks = None;
    }

    /// Type `text` at the selection, replacing any selected text.
    pub fn insert_text(&mut self, text: &str) {
        if self.destroyed || self.selection.is_none() {
            return;
        }
        self.delete_selection();
        let Some(at) = self.selection.map(|s| s.head) else {
            return;
        };
        let marks = self.stored_marks.take().unwrap_or_else(|| self.marks_before(at));
        let block = &mut self.blocks[at.block];
        let idx = block.split_at(at.offset);
        block.runs.insert(idx, Run::new(text, marks));
        block.normalize();
        let caret = Position::new(at.block, at.offset + text.chars().count());
        self.selection = Some(Selection::caret(caret));
        self.emit_changed();
    }

    /// Tear the widget down. Listeners are dropped and further mutations are
    /// ignored.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.listeners.clear();
        self.selection = None;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn clamp(&self, pos: Position) -> Position {
        let block = pos.block.min(self.blocks.len() - 1);
        Position::new(block, pos.offset.min(self.blocks[block].char_len()))
    }

    fn marks_before(&self, at: Position) -> Marks {
        self.blocks
            .get(at.block)
            .and_then(|b| b.run_before(at.offset))
            .map(|r| r.marks.clone())
            .unwrap_or_default()
    }

    /// Marks the next typed character would get.
    fn caret_marks(&self) -> Marks {
        match (&self.stored_marks, self.selection) {
            (Some(marks), _) => marks.clone(),
            (None, Some(sel)) => self.marks_before(sel.head),
            (None, None) => Marks::default(),
        }
    }

    /// `[start, end)` char range selected in each touched block.
    fn block_ranges(&self) -> Vec<(usize, usize, usize)> {
        let Some(sel) = self.selection else {
            return Vec::new();
        };
        let (from, to) = (sel.from(), sel.to());
        (from.block..=to.block.min(self.blocks.len() - 1))
            .map(|b| {
                let len = self.blocks[b].char_len();
                let start = if b == from.block { from.offset.min(len) } else { 0 };
                let end = if b == to.block { to.offset.min(len) } else { len };
                (b, start, end)
            })
            .collect()
    }

    fn selected_runs(&self) -> Vec<&Run> {
        self.block_ranges()
            .into_iter()
            .flat_map(|(b, start, end)| self.blocks[b].runs_between(start, end))
            .collect()
    }

    /// Apply `f` to the marks of the selected text, or to the stored marks
    /// when nothing is selected.
    fn edit_marks(&mut self, mut f: impl FnMut(&mut Marks)) {
        if self.destroyed || self.selection.is_none() {
            return;
        }
        if self.selected_runs().is_empty() {
            let mut marks = self.caret_marks();
            f(&mut marks);
            self.stored_marks = Some(marks);
            self.emit_selection();
            return;
        }
        for (b, start, end) in self.block_ranges() {
            if start >= end {
                continue;
            }
            let block = &mut self.blocks[b];
            let s = block.split_at(start);
            let e = block.split_at(end);
            for run in &mut block.runs[s..e] {
                f(&mut run.marks);
            }
            block.normalize();
        }
        self.emit_changed();
    }

    fn delete_selection(&mut self) {
        let Some(sel) = self.selection else {
            return;
        };
        if sel.is_empty() {
            return;
        }
        let (from, to) = (self.clamp(sel.from()), self.clamp(sel.to()));
        if from.block == to.block {
            let block = &mut self.blocks[from.block];
            let s = block.split_at(from.offset);
            let e = block.split_at(to.offset);
            block.runs.drain(s..e);
            block.normalize();
        } else {
            let last = &mut self.blocks[to.block];
            let e = last.split_at(to.offset);
            let tail: Vec<Run> = last.runs.drain(e..).collect();
            let first = &mut self.blocks[from.block];
            let s = first.split_at(from.offset);
            first.runs.truncate(s);
            first.runs.extend(tail);
            first.normalize();
            self.blocks.drain(from.block + 1..=to.block);
        }
        self.selection = Some(Selection::caret(from));
    }

    fn has_listeners(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|l| l.kind == kind)
    }

    fn dispatch(&mut self, event: EngineEvent) {
        let kind = event.kind();
        for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.handler)(&event);
        }
    }

    fn emit_selection(&mut self) {
        if self.has_listeners(EventKind::SelectionChange) {
            let reading = self.selection_attributes();
            self.dispatch(EngineEvent::SelectionChange(reading));
        }
    }

    fn emit_changed(&mut self) {
        if self.has_listeners(EventKind::ContentChange) {
            let markup = self.serialize();
            self.dispatch(EngineEvent::ContentChange(markup));
        }
        self.emit_selection();
    }
}

impl RichTextEngine for MemoryEngine {
    fn selection(&self) -> Option<Selection> {
        if self.destroyed {
            None
        } else {
            self.selection
        }
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn selection_attributes(&self) -> TextStyleReading {
        if self.destroyed || self.selection.is_none() {
            return TextStyleReading::default();
        }
        let runs = self.selected_runs();
        if runs.is_empty() {
            let marks = self.caret_marks();
            let style = &marks.text_style;
            return TextStyleReading {
                color: AttrReading::collect([style.color.as_ref()]),
                font_family: AttrReading::collect([style.font_family.as_ref()]),
                font_size: AttrReading::collect([style.font_size.as_ref()]),
            };
        }
        TextStyleReading {
            color: AttrReading::collect(runs.iter().map(|r| r.marks.text_style.color.as_ref())),
            font_family: AttrReading::collect(runs.iter().map(|r| r.marks.text_style.font_family.as_ref())),
            font_size: AttrReading::collect(runs.iter().map(|r| r.marks.text_style.font_size.as_ref())),
        }
    }

    fn is_mark_active(&self, kind: MarkKind) -> bool {
        if self.destroyed || self.selection.is_none() {
            return false;
        }
        let runs = self.selected_runs();
        if runs.is_empty() {
            return self.caret_marks().has(kind);
        }
        runs.iter().all(|r| r.marks.has(kind))
    }

    fn apply_mark(&mut self, mark: Mark) {
        self.edit_marks(|marks| match &mark {
            Mark::Bold => marks.bold = true,
            Mark::Italic => marks.italic = true,
            Mark::TextStyle(attrs) => marks.text_style.merge(attrs),
        });
    }

    fn color_spans(&self) -> Vec<(Selection, String)> {
        if self.destroyed {
            return Vec::new();
        }
        let mut spans: Vec<(Selection, String)> = Vec::new();
        for (b, start, end) in self.block_ranges() {
            let mut offset = 0;
            for run in &self.blocks[b].runs {
                let (run_start, run_end) = (offset, offset + run.char_len());
                offset = run_end;
                let (s, e) = (run_start.max(start), run_end.min(end));
                let Some(color) = run.marks.text_style.color.as_ref() else {
                    continue;
                };
                if s >= e {
                    continue;
                }
                // Runs split by bold/italic but sharing a color form one span
                if let Some((last, last_color)) = spans.last_mut() {
                    if last.head == Position::new(b, s) && *last_color == *color {
                        last.head = Position::new(b, e);
                        continue;
                    }
                }
                spans.push((Selection::range(Position::new(b, s), Position::new(b, e)), color.clone()));
            }
        }
        spans
    }

    fn apply_mark_in(&mut self, range: Selection, mark: Mark) {
        if self.destroyed {
            return;
        }
        let target = Selection::range(self.clamp(range.anchor), self.clamp(range.head));
        let saved = self.selection.replace(target);
        let stored = self.stored_marks.take();
        self.apply_mark(mark);
        self.selection = saved;
        self.stored_marks = stored;
        if self.selection.is_some() {
            self.emit_selection();
        }
    }

    fn unset_mark(&mut self, kind: MarkKind) {
        self.edit_marks(|marks| marks.set(kind, false));
    }

    fn toggle_mark(&mut self, kind: MarkKind) {
        if kind == MarkKind::TextStyle && !self.is_mark_active(kind) {
            return;
        }
        let on = !self.is_mark_active(kind);
        let color_reset = self.color_reset && kind != MarkKind::TextStyle;
        self.edit_marks(|marks| {
            marks.set(kind, on);
            if color_reset {
                marks.text_style.color = None;
            }
        });
    }

    fn unset_all_marks(&mut self) {
        self.edit_marks(|marks| *marks = Marks::default());
    }

    fn selected_block_type(&self) -> Option<BlockType> {
        let sel = self.selection()?;
        self.blocks.get(sel.head.block).map(|b| b.kind)
    }

    fn toggle_block(&mut self, block_type: BlockType) {
        if self.destroyed || self.selection.is_none() {
            return;
        }
        let touched: Vec<usize> = self.block_ranges().into_iter().map(|(b, _, _)| b).collect();
        let all_match = touched.iter().all(|&b| self.blocks[b].kind == block_type);
        let target = if all_match { BlockType::Paragraph } else { block_type };
        for b in touched {
            self.blocks[b].kind = target;
        }
        self.emit_changed();
    }

    fn block_attributes(&self, block_type: BlockType) -> Option<BlockAttrs> {
        let sel = self.selection()?;
        self.blocks
            .get(sel.head.block)
            .filter(|b| b.kind == block_type)
            .map(|b| b.attrs)
    }

    fn update_block_attributes(&mut self, block_type: BlockType, update: &mut dyn FnMut(&mut BlockAttrs)) {
        if self.destroyed || self.selection.is_none() {
            return;
        }
        let mut changed = false;
        for (b, _, _) in self.block_ranges() {
            let block = &mut self.blocks[b];
            if block.kind != block_type {
                continue;
            }
            let before = block.attrs;
            update(&mut block.attrs);
            changed |= block.attrs != before;
        }
        if changed {
            self.emit_changed();
        }
    }

    fn set_content(&mut self, markup: &str) {
        if self.destroyed {
            return;
        }
        self.blocks = html::parse(markup);
        self.stored_marks = None;
        if self.selection.is_some() {
            self.selection = Some(Selection::caret(Position::default()));
        }
    }

    fn serialize(&self) -> String {
        html::serialize(&self.blocks)
    }

    fn on(&mut self, kind: EventKind, handler: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Registered { id, kind, handler });
        id
    }

    fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextStyleAttrs;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn select(engine: &mut MemoryEngine, from: usize, to: usize) {
        engine.set_selection(Selection::range(Position::new(0, from), Position::new(0, to)));
    }

    #[test]
    fn test_toggle_bold_on_range() {
        let mut engine = MemoryEngine::from_markup("<p>hello world</p>");
        select(&mut engine, 0, 5);
        engine.toggle_mark(MarkKind::Bold);
        assert_eq!(engine.serialize(), "<p><strong>hello</strong> world</p>");
        assert!(engine.is_mark_active(MarkKind::Bold));

        engine.toggle_mark(MarkKind::Bold);
        assert_eq!(engine.serialize(), "<p>hello world</p>");
    }

    #[test]
    fn test_partial_bold_toggles_on() {
        let mut engine = MemoryEngine::from_markup("<p><strong>ab</strong>cd</p>");
        select(&mut engine, 0, 4);
        assert!(!engine.is_mark_active(MarkKind::Bold));
        engine.toggle_mark(MarkKind::Bold);
        assert_eq!(engine.serialize(), "<p><strong>abcd</strong></p>");
    }

    #[test]
    fn test_color_reset_quirk() {
        let mut engine =
            MemoryEngine::from_markup("<p><span style=\"color: #ff0000\">red</span></p>").with_color_reset();
        select(&mut engine, 0, 3);
        engine.toggle_mark(MarkKind::Italic);
        assert_eq!(engine.serialize(), "<p><em>red</em></p>");
    }

    #[test]
    fn test_caret_marks_apply_to_next_text() {
        let mut engine = MemoryEngine::new();
        engine.set_selection(Selection::caret(Position::default()));
        engine.apply_mark(Mark::TextStyle(TextStyleAttrs::color("#00ff00")));
        engine.toggle_mark(MarkKind::Bold);
        assert!(engine.is_mark_active(MarkKind::Bold));
        engine.insert_text("go");
        assert_eq!(
            engine.serialize(),
            "<p><span style=\"color: #00ff00\"><strong>go</strong></span></p>"
        );
        // Continues with the marks of the text before the caret
        engine.insert_text("!");
        assert_eq!(engine.blocks()[0].runs.len(), 1);
    }

    #[test]
    fn test_selection_attributes_readings() {
        let mut engine = MemoryEngine::from_markup(
            "<p><span style=\"color: #ff0000\">red</span><span style=\"color: #0000ff\">blue</span>plain</p>",
        );
        select(&mut engine, 0, 3);
        assert_eq!(engine.selection_attributes().color, AttrReading::Uniform("#ff0000".into()));
        select(&mut engine, 0, 7);
        assert_eq!(engine.selection_attributes().color, AttrReading::Mixed);
        select(&mut engine, 7, 12);
        assert_eq!(engine.selection_attributes().color, AttrReading::Absent);
    }

    #[test]
    fn test_color_spans_and_ranged_marks() {
        let mut engine = MemoryEngine::from_markup(
            "<p><span style=\"color: #ff0000\">r<strong>ed</strong></span>\
             <span style=\"color: #0000ff\">blue</span>plain</p>",
        );
        select(&mut engine, 1, 9);
        let red = Selection::range(Position::new(0, 1), Position::new(0, 3));
        let blue = Selection::range(Position::new(0, 3), Position::new(0, 7));
        assert_eq!(
            engine.color_spans(),
            vec![(red, "#ff0000".to_string()), (blue, "#0000ff".to_string())]
        );

        let plain = Selection::range(Position::new(0, 7), Position::new(0, 9));
        engine.apply_mark_in(plain, Mark::TextStyle(TextStyleAttrs::color("#00ff00")));
        assert_eq!(engine.selection(), Some(Selection::range(Position::new(0, 1), Position::new(0, 9))));
        assert!(engine
            .serialize()
            .ends_with("<span style=\"color: #00ff00\">pl</span>ain</p>"));
    }

    #[test]
    fn test_toggle_block_and_indent() {
        let mut engine = MemoryEngine::from_markup("<p>one</p><p>two</p>");
        engine.select_all();
        engine.toggle_block(BlockType::BulletItem);
        assert_eq!(engine.serialize(), "<ul><li><p>one</p></li><li><p>two</p></li></ul>");
        assert_eq!(engine.selected_block_type(), Some(BlockType::BulletItem));

        engine.update_block_attributes(BlockType::BulletItem, &mut |attrs| attrs.indent += 1);
        assert_eq!(engine.block_attributes(BlockType::BulletItem), Some(BlockAttrs { indent: 1 }));
        assert_eq!(engine.block_attributes(BlockType::OrderedItem), None);

        engine.toggle_block(BlockType::BulletItem);
        assert_eq!(engine.serialize(), "<p data-indent=\"1\">one</p><p data-indent=\"1\">two</p>");
    }

    #[test]
    fn test_events_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut engine = MemoryEngine::from_markup("<p>text</p>");
        let l = log.clone();
        engine.on(EventKind::ContentChange, Box::new(move |_: &EngineEvent| l.borrow_mut().push("content")));
        let l = log.clone();
        let sel = engine.on(EventKind::SelectionChange, Box::new(move |_: &EngineEvent| l.borrow_mut().push("selection")));

        select(&mut engine, 0, 4);
        engine.toggle_mark(MarkKind::Italic);
        assert_eq!(*log.borrow(), vec!["selection", "content", "selection"]);

        assert!(engine.off(sel));
        assert!(!engine.off(sel));
        assert_eq!(engine.listener_count(), 1);
    }

    #[test]
    fn test_destroyed_engine_is_inert() {
        let mut engine = MemoryEngine::from_markup("<p>text</p>");
        select(&mut engine, 0, 4);
        engine.destroy();
        engine.toggle_mark(MarkKind::Bold);
        engine.set_content("<p>other</p>");
        assert_eq!(engine.serialize(), "<p>text</p>");
        assert!(engine.selection().is_none());
        assert_eq!(engine.listener_count(), 0);
    }

    #[test]
    fn test_insert_replaces_multi_block_range() {
        let mut engine = MemoryEngine::from_markup("<p>abc</p><p>def</p>");
        engine.set_selection(Selection::range(Position::new(0, 1), Position::new(1, 2)));
        engine.insert_text("X");
        assert_eq!(engine.serialize(), "<p>aXf</p>");
    }
}
