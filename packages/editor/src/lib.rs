//! Editing core: the attribute store, formatting commands, content
//! synchronization and the role gate, over an abstract rich-text engine.

pub mod attributes;
pub mod engine;
pub mod error;
pub mod format;
pub mod roles;
pub mod session;
pub mod sync;
pub mod template;
pub mod text_style;

pub use attributes::{ActiveAttributes, AttrReading, AttributeField, AttributePatch, AttributeStore, FieldState};
pub use engine::{MemoryEngine, RichTextEngine};
pub use error::{SyncError, UnknownRole};
pub use format::{Applied, FormattingExecutor, FormattingToggle, MAX_INDENT};
pub use roles::{Capabilities, EditTarget, Identity, Role, Session, ToolbarVariant};
pub use session::EditorSession;
pub use sync::{ContentSynchronizer, Surface, SurfaceMode};
pub use template::{
    apply_dimensions, dimensions_or_default, ensure_dimensions, extract_dimensions_from_css, generate_dimensions_css,
    PageDimensions,
};
pub use text_style::generate_css_from_text_styles;
