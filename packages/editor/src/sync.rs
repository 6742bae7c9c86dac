//! # Content synchronizer
//!
//! Keeps the document's markup string in step with the editable surface and
//! hands the same string to the static preview.
//!
//! Exactly one surface writes. When the session may edit, the editable
//! surface forwards every change through [`ContentSynchronizer::on_host_edit`];
//! otherwise the content is only ever rendered through the static path and
//! host edits are refused.
//!
//! [`ContentSynchronizer::render`] does not parse or rewrite markup, so
//! rendering a string twice gives the same bytes twice.

use tracing::warn;

use crate::error::SyncError;

/// Which surface a session renders the document with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceMode {
    Editable,
    Static,
}

/// Output of [`ContentSynchronizer::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Markup to seed the editing widget with.
    Editable { seed: String },
    /// Read-only markup for the preview.
    Static { markup: String },
}

impl Surface {
    pub fn markup(&self) -> &str {
        match self {
            Surface::Editable { seed } => seed,
            Surface::Static { markup } => markup,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentSynchronizer {
    writer: SurfaceMode,
    content: String,
    saved: String,
}

impl ContentSynchronizer {
    pub fn new(initial: impl Into<String>, writer: SurfaceMode) -> Self {
        let content = initial.into();
        Self {
            writer,
            saved: content.clone(),
            content,
        }
    }

    pub fn writer(&self) -> SurfaceMode {
        self.writer
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Accept new markup from the editing widget, unchanged.
    pub fn on_host_edit(&mut self, content: String) -> Result<(), SyncError> {
        if self.writer != SurfaceMode::Editable {
            warn!("Rejected host edit on a read-only session");
            return Err(SyncError::ReadOnly);
        }
        self.content = content;
        Ok(())
    }

    pub fn render(content: &str, mode: SurfaceMode) -> Surface {
        match mode {
            SurfaceMode::Editable => Surface::Editable {
                seed: content.to_string(),
            },
            SurfaceMode::Static => Surface::Static {
                markup: content.to_string(),
            },
        }
    }

    /// The static rendering of the current content.
    pub fn preview(&self) -> Surface {
        Self::render(&self.content, SurfaceMode::Static)
    }

    /// Unsaved edits since construction, [`load`](Self::load) or the last
    /// [`mark_saved`](Self::mark_saved).
    pub fn is_dirty(&self) -> bool {
        self.content != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.content.clone();
    }

    /// Content to hand to the store when there are unsaved edits. Nothing is
    /// marked saved until the store confirms through
    /// [`confirm_saved`](Self::confirm_saved).
    pub fn pending_save(&self) -> Option<String> {
        self.is_dirty().then(|| self.content.clone())
    }

    /// Record that `persisted` reached the store. Edits made after that
    /// content was taken stay dirty. Returns whether the content is now clean.
    pub fn confirm_saved(&mut self, persisted: &str) -> bool {
        if persisted == self.content {
            self.saved = self.content.clone();
        }
        !self.is_dirty()
    }

    /// Replace the content with a freshly loaded document.
    pub fn load(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.saved = self.content.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_edit_forwards_unchanged() {
        let mut sync = ContentSynchronizer::new("<p></p>", SurfaceMode::Editable);
        let edited = "<p>  odd <b>spacing</b></p>".to_string();
        sync.on_host_edit(edited.clone()).unwrap();
        assert_eq!(sync.content(), edited);
        assert!(sync.is_dirty());
        sync.mark_saved();
        assert!(!sync.is_dirty());
    }

    #[test]
    fn test_static_writer_rejects_edits() {
        let mut sync = ContentSynchronizer::new("<p>kept</p>", SurfaceMode::Static);
        assert_eq!(sync.on_host_edit("<p>x</p>".to_string()), Err(SyncError::ReadOnly));
        assert_eq!(sync.content(), "<p>kept</p>");
        assert!(!sync.is_dirty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let markup = "<p><span style=\"color: #ff0000\">a &amp; b</span></p><ul><li><p>x</p></li></ul>";
        let first = ContentSynchronizer::render(markup, SurfaceMode::Static);
        let second = ContentSynchronizer::render(first.markup(), SurfaceMode::Static);
        assert_eq!(first, second);
        assert_eq!(first.markup(), markup);
    }

    #[test]
    fn test_unconfirmed_save_stays_dirty() {
        let mut sync = ContentSynchronizer::new("<p></p>", SurfaceMode::Editable);
        assert_eq!(sync.pending_save(), None);

        sync.on_host_edit("<p>a</p>".to_string()).unwrap();
        let first = sync.pending_save().unwrap();
        // The store failed; the same content is offered again
        assert_eq!(sync.pending_save(), Some(first.clone()));

        sync.on_host_edit("<p>ab</p>".to_string()).unwrap();
        assert!(!sync.confirm_saved(&first));
        assert!(sync.is_dirty());

        assert!(sync.confirm_saved("<p>ab</p>"));
        assert_eq!(sync.pending_save(), None);
    }

    #[test]
    fn test_load_resets_dirty_state() {
        let mut sync = ContentSynchronizer::new("", SurfaceMode::Editable);
        sync.on_host_edit("<p>a</p>".to_string()).unwrap();
        sync.load("<p>b</p>");
        assert_eq!(sync.content(), "<p>b</p>");
        assert!(!sync.is_dirty());
    }
}
