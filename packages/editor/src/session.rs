//! # Editor session
//!
//! [`EditorSession`] is the toolbar/editor composite for one editing session.
//! It owns the engine, the attribute store and the content synchronizer, and
//! wires them together through engine events:
//!
//! - `selectionChange` resyncs the attribute store;
//! - `contentChange` forwards the markup to the synchronizer.
//!
//! Both subscriptions are removed when the session is dropped.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use store::FolioConfig;
use tracing::{debug, warn};

use crate::attributes::{ActiveAttributes, AttributePatch, AttributeStore};
use crate::engine::{
    BlockType, EngineEvent, EventKind, ListenerId, Mark, MarkKind, RichTextEngine, TextStyleAttrs,
};
use crate::error::SyncError;
use crate::format::{Applied, FormattingExecutor, FormattingToggle};
use crate::roles::{Capabilities, Session};
use crate::sync::{ContentSynchronizer, Surface};

pub struct EditorSession<E: RichTextEngine> {
    engine: E,
    attributes: Rc<RefCell<AttributeStore>>,
    sync: Rc<RefCell<ContentSynchronizer>>,
    executor: FormattingExecutor,
    capabilities: Capabilities,
    listeners: Vec<ListenerId>,
}

impl<E: RichTextEngine> EditorSession<E> {
    /// Load `content` into `engine` and subscribe to its events.
    ///
    /// Sessions whose role cannot edit get [`SyncError::ReadOnly`]; they render
    /// through the static path instead.
    pub fn new(mut engine: E, session: &Session, config: &FolioConfig, content: &str) -> Result<Self, SyncError> {
        let capabilities = session.capabilities();
        if !capabilities.can_edit {
            warn!("Refusing editor session for role {:?}", session.role);
            return Err(SyncError::ReadOnly);
        }

        engine.set_content(content);
        let attributes = Rc::new(RefCell::new(AttributeStore::new(ActiveAttributes::from(&config.attributes))));
        let sync = Rc::new(RefCell::new(ContentSynchronizer::new(
            engine.serialize(),
            capabilities.surface_mode(),
        )));

        let store = Rc::clone(&attributes);
        let on_selection = engine.on(
            EventKind::SelectionChange,
            Box::new(move |event: &EngineEvent| {
                if let EngineEvent::SelectionChange(reading) = event {
                    store.borrow_mut().resync(reading);
                }
            }),
        );
        let synchronizer = Rc::clone(&sync);
        let on_content = engine.on(
            EventKind::ContentChange,
            Box::new(move |event: &EngineEvent| {
                if let EngineEvent::ContentChange(markup) = event {
                    if let Err(e) = synchronizer.borrow_mut().on_host_edit(markup.clone()) {
                        warn!("Dropped content change: {}", e);
                    }
                }
            }),
        );

        Ok(Self {
            engine,
            attributes,
            sync,
            executor: FormattingExecutor::from_config(config),
            capabilities,
            listeners: vec![on_selection, on_content],
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct access for selection moves and typing. Events still flow into the
    /// session.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn attributes(&self) -> Ref<'_, AttributeStore> {
        self.attributes.borrow()
    }

    pub fn content(&self) -> String {
        self.sync.borrow().content().to_string()
    }

    pub fn preview(&self) -> Surface {
        self.sync.borrow().preview()
    }

    pub fn is_dirty(&self) -> bool {
        self.sync.borrow().is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.sync.borrow_mut().mark_saved();
    }

    /// See [`ContentSynchronizer::pending_save`].
    pub fn pending_save(&self) -> Option<String> {
        self.sync.borrow().pending_save()
    }

    /// See [`ContentSynchronizer::confirm_saved`].
    pub fn confirm_saved(&mut self, persisted: &str) -> bool {
        self.sync.borrow_mut().confirm_saved(persisted)
    }

    /// Put unsaved content back into the engine. The session stays dirty until
    /// the draft is confirmed saved.
    pub fn restore_draft(&mut self, draft: &str) {
        self.engine.set_content(draft);
        let markup = self.engine.serialize();
        if let Err(e) = self.sync.borrow_mut().on_host_edit(markup) {
            warn!("Could not restore draft: {}", e);
        }
    }

    /// Run a toolbar command.
    pub fn apply(&mut self, toggle: FormattingToggle) -> Applied {
        // The engine fires events while the command runs; hold no borrow.
        let snapshot = self.attributes.borrow().clone();
        let applied = self.executor.apply(&mut self.engine, toggle, &snapshot);
        if applied == Applied::Cleared {
            self.attributes.borrow_mut().reset();
        }
        applied
    }

    /// Whether the toolbar should show `toggle` as pressed.
    pub fn is_active(&self, toggle: FormattingToggle) -> bool {
        match toggle {
            FormattingToggle::Bold => self.engine.is_mark_active(MarkKind::Bold),
            FormattingToggle::Italic => self.engine.is_mark_active(MarkKind::Italic),
            FormattingToggle::BulletList => self.engine.selected_block_type() == Some(BlockType::BulletItem),
            FormattingToggle::OrderedList => self.engine.selected_block_type() == Some(BlockType::OrderedItem),
            FormattingToggle::Indent | FormattingToggle::Outdent | FormattingToggle::ClearFormatting => false,
        }
    }

    pub fn set_color(&mut self, color: &str) {
        self.attributes.borrow_mut().set(AttributePatch::color(color));
        if self.engine.selection().is_none() {
            return;
        }
        self.engine.apply_mark(Mark::TextStyle(TextStyleAttrs::color(color)));
        if self.engine.is_mark_active(MarkKind::Bold) {
            self.executor.reassert_color(&mut self.engine, color);
        }
        debug!("Color set to {}", color);
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.attributes.borrow_mut().set(AttributePatch::font_family(family));
        if self.engine.selection().is_some() {
            self.engine.apply_mark(Mark::TextStyle(TextStyleAttrs::font_family(family)));
        }
    }

    pub fn set_font_size(&mut self, size: &str) {
        self.attributes.borrow_mut().set(AttributePatch::font_size(size));
        if self.engine.selection().is_some() {
            self.engine.apply_mark(Mark::TextStyle(TextStyleAttrs::font_size(size)));
        }
    }

    /// Load another document into the same engine.
    pub fn switch_document(&mut self, content: &str) {
        self.engine.set_content(content);
        let markup = self.engine.serialize();
        self.sync.borrow_mut().load(markup);
        self.attributes.borrow_mut().reset();
        debug!("Switched document");
    }
}

impl<E: RichTextEngine> Drop for EditorSession<E> {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.engine.off(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeField, FieldState};
    use crate::engine::{MemoryEngine, Position, Selection};
    use crate::roles::Role;

    fn editor() -> Session {
        Session::guest(Some(Role::Editor))
    }

    #[test]
    fn test_non_editing_role_is_refused() {
        let result = EditorSession::new(
            MemoryEngine::new(),
            &Session::guest(None),
            &FolioConfig::default(),
            "<p></p>",
        );
        assert!(matches!(result, Err(SyncError::ReadOnly)));
    }

    #[test]
    fn test_edits_flow_into_synchronizer() {
        let mut session =
            EditorSession::new(MemoryEngine::new(), &editor(), &FolioConfig::default(), "<p>hi</p>").unwrap();
        assert!(!session.is_dirty());

        session.engine_mut().set_selection(Selection::caret(Position::new(0, 2)));
        session.engine_mut().insert_text("!");
        assert_eq!(session.content(), "<p>hi!</p>");
        assert!(session.is_dirty());
        assert_eq!(session.preview().markup(), "<p>hi!</p>");

        session.mark_saved();
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_selection_resyncs_attributes() {
        let mut session = EditorSession::new(
            MemoryEngine::new(),
            &editor(),
            &FolioConfig::default(),
            "<p><span style=\"color: #ff0000\">r</span><span style=\"color: #00ff00\">g</span></p>",
        )
        .unwrap();

        session.engine_mut().set_selection(Selection::range(Position::new(0, 0), Position::new(0, 1)));
        assert_eq!(session.attributes().get().font_color, "#ff0000");

        session.engine_mut().set_selection(Selection::range(Position::new(0, 0), Position::new(0, 2)));
        assert_eq!(session.attributes().field(AttributeField::FontColor), FieldState::Ambiguous);

        session.set_color("#0000ff");
        assert_eq!(session.attributes().field(AttributeField::FontColor), FieldState::Known("#0000ff"));
        assert!(session.content().contains("color: #0000ff"));
    }

    #[test]
    fn test_clear_formatting_resets_attributes() {
        let mut session = EditorSession::new(
            MemoryEngine::new(),
            &editor(),
            &FolioConfig::default(),
            "<p><span style=\"font-family: Lato\"><strong>x</strong></span></p>",
        )
        .unwrap();
        session.engine_mut().select_all();
        assert_eq!(session.attributes().get().font_family, "Lato");

        assert_eq!(session.apply(FormattingToggle::ClearFormatting), Applied::Cleared);
        assert_eq!(session.content(), "<p>x</p>");
        assert_eq!(session.attributes().get(), &ActiveAttributes::default());
        assert!(!session.is_active(FormattingToggle::Bold));
    }

    #[test]
    fn test_switch_document() {
        let mut session =
            EditorSession::new(MemoryEngine::new(), &editor(), &FolioConfig::default(), "<p>one</p>").unwrap();
        session.set_font_size("24px");
        session.switch_document("<ul><li><p>two</p></li></ul>");
        assert_eq!(session.content(), "<ul><li><p>two</p></li></ul>");
        assert!(!session.is_dirty());
        assert_eq!(session.attributes().get().font_size, "16px");
    }

    #[test]
    fn test_restored_draft_waits_for_confirmation() {
        let mut session =
            EditorSession::new(MemoryEngine::new(), &editor(), &FolioConfig::default(), "<p>stored</p>").unwrap();
        session.restore_draft("<p>stored and edited</p>");
        assert!(session.is_dirty());
        assert_eq!(session.pending_save().as_deref(), Some("<p>stored and edited</p>"));

        // A stale copy of the stored document confirms nothing
        assert!(!session.confirm_saved("<p>stored</p>"));
        assert!(session.confirm_saved("<p>stored and edited</p>"));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let mut engine = MemoryEngine::new();
        {
            let session = EditorSession::new(&mut engine, &editor(), &FolioConfig::default(), "<p>x</p>").unwrap();
            assert_eq!(session.engine().listener_count(), 2);
        }
        assert_eq!(engine.listener_count(), 0);
    }
}
