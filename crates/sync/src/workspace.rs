//! Workspace host collaborator interface
//!
//! The engine never talks to panes, tabs, or views directly; the embedding
//! host implements this trait and broadcasts focus/layout events through a
//! `tokio::sync::broadcast` channel. One receiver per engine keeps event
//! handling strictly sequential.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::surface::CanvasSurface;

/// A document currently open in some pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub path: String,
    pub display_name: String,
}

impl OpenDocument {
    pub fn new(path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
        }
    }
}

/// Workspace-level notifications the engine reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// The focused pane changed (possibly to a pane with no document)
    FocusChanged,
    /// Panes were opened, closed, or rearranged
    LayoutChanged,
    /// The surface rendering `path` was detached
    SurfaceClosed { path: String },
}

/// The host application, seen through the capabilities the engine consumes
#[async_trait]
pub trait WorkspaceHost: Send + Sync {
    /// Every open document across all panes and split groups; empty when
    /// the workspace has no panes. Host traversal order, no guarantees.
    async fn list_open_documents(&self) -> Vec<OpenDocument>;

    /// Path of the document in the focused pane, if any
    async fn active_document(&self) -> Option<String>;

    /// Open a document in a pane; `foreground=false` must not steal focus
    async fn open_in_pane(&self, path: &str, foreground: bool) -> anyhow::Result<()>;

    /// Locate the live surface rendering `path`, if one is open
    async fn find_canvas_surface(&self, path: &str) -> Option<Arc<dyn CanvasSurface>>;

    /// Subscribe to workspace events
    fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent>;
}
