//! Synchronization engine
//!
//! One engine instance per bound surface. It owns the file-node index and
//! all highlight/background-open view state for that surface, re-derives
//! everything from scratch on each focus change (card counts are tens, not
//! thousands), and discards the lot on unbind. Nothing survives a rebind.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::binder::{await_ready, find_surface_for};
use crate::index::{rebuild_with_retry, FileNodeIndex};
use crate::settings::{SyncSettings, Timing};
use crate::surface::CanvasSurface;
use crate::workspace::{WorkspaceEvent, WorkspaceHost};

/// Lifecycle of an engine relative to its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    Binding,
    Bound,
}

/// Per-surface synchronization state machine
pub struct SyncEngine {
    host: Arc<dyn WorkspaceHost>,
    settings: SyncSettings,
    timing: Timing,
    surface: Option<Arc<dyn CanvasSurface>>,
    index: FileNodeIndex,
    /// Card currently carrying the active highlight; at most one, always
    highlighted: Option<String>,
    state: BindState,
}

impl SyncEngine {
    pub fn new(host: Arc<dyn WorkspaceHost>, settings: SyncSettings, timing: Timing) -> Self {
        Self {
            host,
            settings,
            timing,
            surface: None,
            index: FileNodeIndex::default(),
            highlighted: None,
            state: BindState::Unbound,
        }
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    /// Attach to the surface rendering `canvas_path`
    ///
    /// Refused outright while auto-activation is disabled in settings.
    /// Otherwise waits for surface readiness, builds the index, and runs an
    /// initial highlight/background derivation. A readiness timeout rolls
    /// back to `Unbound` with no partial activation.
    pub async fn bind(&mut self, canvas_path: &str) -> bool {
        if !self.settings.auto_activate_on_all_canvases {
            debug!(canvas = %canvas_path, "auto-activation disabled, staying unbound");
            return false;
        }
        self.state = BindState::Binding;

        let Some(surface) = find_surface_for(self.host.as_ref(), canvas_path).await else {
            debug!(canvas = %canvas_path, "no surface open for canvas, staying unbound");
            self.state = BindState::Unbound;
            return false;
        };
        if !await_ready(surface.as_ref(), &self.timing).await {
            debug!(canvas = %canvas_path, "surface not ready, skipping activation");
            self.state = BindState::Unbound;
            return false;
        }

        self.index = rebuild_with_retry(&surface, &self.timing).await;
        info!(canvas = %canvas_path, cards = self.index.len(), "bound to canvas surface");
        self.surface = Some(surface);
        self.state = BindState::Bound;
        self.refresh().await;
        true
    }

    /// Detach: clear every mark, drop the index, forget the surface
    pub fn unbind(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.clear_marks();
            info!(canvas = %surface.path(), "unbound from canvas surface");
        }
        self.highlighted = None;
        self.index = FileNodeIndex::default();
        self.state = BindState::Unbound;
    }

    /// React to one workspace event; strictly sequential per engine
    pub async fn handle_event(&mut self, event: &WorkspaceEvent) {
        match event {
            WorkspaceEvent::FocusChanged | WorkspaceEvent::LayoutChanged => {
                if self.state == BindState::Bound {
                    self.refresh().await;
                }
            }
            WorkspaceEvent::SurfaceClosed { path } => {
                if self.surface.as_ref().is_some_and(|s| s.path() == *path) {
                    self.unbind();
                }
            }
        }
    }

    /// Bind and process events until the surface closes
    pub async fn run(mut self, canvas_path: &str) {
        // Subscribe before binding so no event between bind and loop is lost
        let mut events = self.host.subscribe();
        if !self.bind(canvas_path).await {
            return;
        }
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event).await;
                    if self.state == BindState::Unbound {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "workspace event stream lagged, re-deriving state");
                    self.refresh().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Full re-derivation of index, highlight, and background marks
    async fn refresh(&mut self) {
        let Some(surface) = self.surface.clone() else {
            return;
        };

        // The surface's node set changed shape: the index is stale
        if surface.node_count() != self.index.indexed_node_count() {
            self.index = rebuild_with_retry(&surface, &self.timing).await;
        }

        let active = self.host.active_document().await;
        self.update_highlight(surface.as_ref(), active.as_deref());
        self.update_background_marks(surface.as_ref(), active.as_deref()).await;
    }

    /// Move the single active highlight to the card for `active`, if any
    fn update_highlight(&mut self, surface: &dyn CanvasSurface, active: Option<&str>) {
        let target = if self.settings.enable_highlighting {
            active
                .and_then(|path| self.index.card_for(path))
                .map(ToString::to_string)
        } else {
            None
        };

        if target == self.highlighted {
            return;
        }
        if let Some(prev) = self.highlighted.take() {
            surface.set_highlighted(&prev, false);
        }
        if let Some(card) = &target {
            surface.set_highlighted(card, true);
        }
        self.highlighted = target;
    }

    /// Mark every indexed card whose document is open in a non-focused pane
    ///
    /// Full re-derivation against the open-document scan, not a diff.
    async fn update_background_marks(&self, surface: &dyn CanvasSurface, active: Option<&str>) {
        let open: HashSet<String> = self
            .host
            .list_open_documents()
            .await
            .into_iter()
            .map(|doc| doc.path)
            .collect();

        for (path, card_id) in self.index.iter() {
            let background = open.contains(path) && active != Some(path);
            surface.set_background_open(card_id, background);
        }
    }
}
