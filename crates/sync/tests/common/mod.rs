//! Shared fakes for sync integration tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cardboard_sync::{
    CanvasChoice, CanvasSurface, CardHandle, Notifier, OpenDocument, WorkspaceEvent, WorkspaceHost,
};
use tokio::sync::broadcast;

/// Surface that is immediately ready and renders no cards
pub struct ReadySurface {
    path: String,
}

impl ReadySurface {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

impl CanvasSurface for ReadySurface {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn node_count(&self) -> usize {
        0
    }

    fn cards(&self) -> Vec<CardHandle> {
        Vec::new()
    }

    fn set_highlighted(&self, _card_id: &str, _on: bool) {}
    fn set_background_open(&self, _card_id: &str, _on: bool) {}
    fn clear_marks(&self) {}
}

/// Workspace fake: configurable open documents, pane-open recording, and a
/// ready surface auto-registered for every canvas opened in a pane
pub struct FakeWorkspace {
    pub open: Mutex<Vec<OpenDocument>>,
    pub active: Mutex<Option<String>>,
    pub surfaces: Mutex<HashMap<String, Arc<dyn CanvasSurface>>>,
    /// `(path, foreground)` per open_in_pane call
    pub opened_panes: Mutex<Vec<(String, bool)>>,
    pub events: broadcast::Sender<WorkspaceEvent>,
}

impl Default for FakeWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWorkspace {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            open: Mutex::new(Vec::new()),
            active: Mutex::new(None),
            surfaces: Mutex::new(HashMap::new()),
            opened_panes: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn with_open(docs: &[&str]) -> Self {
        let workspace = Self::new();
        *workspace.open.lock().unwrap() =
            docs.iter().map(|p| OpenDocument::new(*p, *p)).collect();
        workspace
    }
}

#[async_trait]
impl WorkspaceHost for FakeWorkspace {
    async fn list_open_documents(&self) -> Vec<OpenDocument> {
        self.open.lock().unwrap().clone()
    }

    async fn active_document(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    async fn open_in_pane(&self, path: &str, foreground: bool) -> anyhow::Result<()> {
        self.opened_panes
            .lock()
            .unwrap()
            .push((path.to_string(), foreground));
        if path.ends_with(".canvas") {
            self.surfaces
                .lock()
                .unwrap()
                .insert(path.to_string(), Arc::new(ReadySurface::new(path)));
        }
        Ok(())
    }

    async fn find_canvas_surface(&self, path: &str) -> Option<Arc<dyn CanvasSurface>> {
        self.surfaces.lock().unwrap().get(path).cloned()
    }

    fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }
}

/// Notifier that records toasts and picks the first offered canvas
pub struct RecordingNotifier {
    pub toasts: Mutex<Vec<String>>,
    pub offered: Mutex<Vec<CanvasChoice>>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            toasts: Mutex::new(Vec::new()),
            offered: Mutex::new(Vec::new()),
        }
    }

    pub fn toast_count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }

    async fn pick_canvas(&self, choices: Vec<CanvasChoice>) -> Option<String> {
        let first = choices.first().map(|c| c.path.clone());
        *self.offered.lock().unwrap() = choices;
        first
    }
}
