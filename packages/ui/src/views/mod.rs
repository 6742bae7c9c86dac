mod workspace;
pub use workspace::WorkspaceView;
