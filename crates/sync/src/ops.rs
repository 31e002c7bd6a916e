//! Batch mutation operations
//!
//! Creating a canvas from a batch of documents and appending cards to an
//! existing canvas. Every mutation is a read-modify-write of the canvas
//! JSON with no lock against the host's own rendering surface; the ordering
//! and settle delays here are the best-effort mitigations for that race
//! (valid file on disk before a view opens it, settle after writes, append
//! over blind overwrite). A write landing between our read and our write is
//! still last-writer-wins.

use std::collections::HashMap;
use std::sync::Arc;

use cardboard_canvas::{
    parse_canvas, plan_grid, plan_single_insertion, serialize_canvas, CanvasDocument, FileCard,
    DEFAULT_SINGLE_INSERTION_DROP,
};
use cardboard_vault::VaultBackend;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::binder::{await_ready, find_surface_for};
use crate::error::{Result, SyncError};
use crate::notify::{CanvasChoice, Notifier};
use crate::settings::{SyncSettings, Timing};
use crate::tracker::CanvasInfoTracker;
use crate::workspace::{OpenDocument, WorkspaceHost};

/// Canvas mutation entry points, wired to the collaborator seams
pub struct CanvasOps {
    vault: Arc<dyn VaultBackend>,
    host: Arc<dyn WorkspaceHost>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<CanvasInfoTracker>,
    settings: SyncSettings,
    timing: Timing,
}

impl CanvasOps {
    pub fn new(
        vault: Arc<dyn VaultBackend>,
        host: Arc<dyn WorkspaceHost>,
        notifier: Arc<dyn Notifier>,
        tracker: Arc<CanvasInfoTracker>,
        settings: SyncSettings,
        timing: Timing,
    ) -> Self {
        Self {
            vault,
            host,
            notifier,
            tracker,
            settings,
            timing,
        }
    }

    /// Create a new canvas holding one card per document
    ///
    /// Returns the vault path of the created canvas. An empty batch is a
    /// benign no-op failure: nothing is written.
    pub async fn create_canvas_from_batch(&self, docs: &[OpenDocument]) -> Result<String> {
        let result = self.create_from_batch_inner(docs).await;
        if let Err(err) = &result {
            self.surface_failure(err);
        }
        result
    }

    /// Create a canvas from every currently open document
    ///
    /// Canvas files themselves are excluded so a canvas never ends up
    /// holding a card for itself.
    pub async fn create_canvas_from_open_documents(&self) -> Result<String> {
        let docs: Vec<OpenDocument> = self
            .host
            .list_open_documents()
            .await
            .into_iter()
            .filter(|doc| !doc.path.ends_with(".canvas"))
            .collect();
        self.create_canvas_from_batch(&docs).await
    }

    /// Append one card per document to an existing canvas
    pub async fn append_to_canvas(&self, canvas_path: &str, docs: &[OpenDocument]) -> Result<()> {
        let result = self.append_inner(canvas_path, docs).await;
        if let Err(err) = &result {
            self.surface_failure(err);
        }
        result
    }

    /// Let the user pick a canvas, then append the document to it
    ///
    /// Returns `None` when the user dismissed the picker.
    pub async fn send_document(&self, doc: &OpenDocument) -> Result<Option<String>> {
        if !self.settings.enable_send_tab_to_canvas {
            debug!("send-to-canvas disabled in settings");
            return Ok(None);
        }
        let choices = self.canvas_choices().await;
        if choices.is_empty() {
            let err = SyncError::NoTarget("No canvases available yet");
            self.surface_failure(&err);
            return Err(err);
        }
        let Some(canvas_path) = self.notifier.pick_canvas(choices).await else {
            return Ok(None);
        };
        self.append_to_canvas(&canvas_path, std::slice::from_ref(doc)).await?;
        if self.settings.show_navigation_hints {
            self.notifier
                .toast(&format!("Added {} to {canvas_path}", doc.display_name));
        }
        Ok(Some(canvas_path))
    }

    /// Canvases in the output folder, most recently modified first
    ///
    /// The tracker's in-process timestamps outrank backend mtimes: a canvas
    /// this process just touched sorts first even when the backend reports
    /// a coarser or stale modification time.
    pub async fn canvas_choices(&self) -> Vec<CanvasChoice> {
        let folder = &self.settings.canvas_output_folder;
        let Ok(names) = self.vault.list(if folder.is_empty() { "/" } else { folder }).await
        else {
            return Vec::new();
        };

        let mut choices = Vec::new();
        for name in names {
            if !name.ends_with(".canvas") {
                continue;
            }
            let path = self.settings.output_path(&name);
            // One unreadable file never hides the rest
            let Ok(info) = self.vault.stat(&path).await else {
                continue;
            };
            let last_modified = info
                .modified
                .map_or_else(Utc::now, DateTime::<Utc>::from);
            choices.push(CanvasChoice {
                name: name.trim_end_matches(".canvas").to_string(),
                path,
                last_modified,
            });
        }
        let tracked: HashMap<String, DateTime<Utc>> = self
            .tracker
            .choices()
            .into_iter()
            .map(|choice| (choice.path, choice.last_modified))
            .collect();
        for choice in &mut choices {
            if let Some(touched) = tracked.get(&choice.path) {
                choice.last_modified = (*touched).max(choice.last_modified);
            }
        }
        choices.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        choices
    }

    async fn create_from_batch_inner(&self, docs: &[OpenDocument]) -> Result<String> {
        self.ensure_batch_ops_enabled()?;
        if docs.is_empty() {
            return Err(SyncError::NoTarget("No open documents to place on a canvas"));
        }

        let filename = format!("Canvas-{}.canvas", Utc::now().format("%Y%m%d-%H%M%S"));
        let path = self.settings.output_path(&filename);
        if self.vault.exists(&path).await.unwrap_or(false) {
            return Err(SyncError::Io(format!("{path}: file already exists")));
        }

        // A fully-valid empty document must be on disk before any view of
        // it opens; later failures leave a well-formed file behind
        self.write_canvas(&path, &CanvasDocument::empty()).await?;

        self.host
            .open_in_pane(&path, false)
            .await
            .map_err(|e| SyncError::io(&path, &e))?;

        // Writing again before the surface's first read completes can lose
        // the update on some host versions, so wait for it when we can
        if let Some(surface) = find_surface_for(self.host.as_ref(), &path).await {
            if !await_ready(surface.as_ref(), &self.timing).await {
                debug!(canvas = %path, "surface never became ready; writing anyway");
            }
        }

        let size = self.settings.card_size_f();
        let positions = plan_grid(docs.len(), size, size, self.settings.card_spacing_f());
        let mut doc = CanvasDocument::empty();
        for (open_doc, position) in docs.iter().zip(positions) {
            doc.push_card(FileCard::new(&open_doc.path, position.x, position.y, size, size));
        }

        self.write_canvas(&path, &doc).await?;
        tokio::time::sleep(self.timing.write_settle).await;
        self.tracker.touch(&path);
        info!(canvas = %path, cards = docs.len(), "created canvas from batch");
        Ok(path)
    }

    async fn append_inner(&self, canvas_path: &str, docs: &[OpenDocument]) -> Result<()> {
        self.ensure_batch_ops_enabled()?;
        if docs.is_empty() {
            return Err(SyncError::NoTarget("No documents to append"));
        }

        // If the canvas is on screen, give its surface a chance to finish
        // loading before the read-modify-write; a user-initiated append on
        // a surface that never settles is reported, not silently raced
        if let Some(surface) = find_surface_for(self.host.as_ref(), canvas_path).await {
            if !await_ready(surface.as_ref(), &self.timing).await {
                return Err(SyncError::SurfaceNotReady(self.timing.ready_timeout));
            }
        }

        // Malformed content fails here, before anything touches the file
        let mut doc = self.read_canvas(canvas_path).await?;
        doc.ensure_metadata();

        let size = self.settings.card_size_f();
        let anchor = plan_single_insertion(
            self.tracker.focus_of(canvas_path),
            DEFAULT_SINGLE_INSERTION_DROP,
        );
        if docs.len() == 1 {
            doc.push_card(FileCard::new(&docs[0].path, anchor.x, anchor.y, size, size));
        } else {
            let grid = plan_grid(docs.len(), size, size, self.settings.card_spacing_f());
            for (open_doc, position) in docs.iter().zip(grid) {
                let p = position.offset(anchor);
                doc.push_card(FileCard::new(&open_doc.path, p.x, p.y, size, size));
            }
        }

        self.write_canvas(canvas_path, &doc).await?;
        tokio::time::sleep(self.timing.write_settle).await;
        self.tracker.touch(canvas_path);
        info!(canvas = %canvas_path, cards = docs.len(), "appended cards to canvas");
        Ok(())
    }

    async fn read_canvas(&self, path: &str) -> Result<CanvasDocument> {
        let bytes = self
            .vault
            .read(path)
            .await
            .map_err(|e| SyncError::io(path, &e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            SyncError::Malformed(cardboard_canvas::CanvasError::Malformed(e.to_string()))
        })?;
        Ok(parse_canvas(&text)?)
    }

    async fn write_canvas(&self, path: &str, doc: &CanvasDocument) -> Result<()> {
        let text = serialize_canvas(doc)?;
        self.vault
            .write(path, text.as_bytes())
            .await
            .map_err(|e| SyncError::io(path, &e))
    }

    fn ensure_batch_ops_enabled(&self) -> Result<()> {
        if self.settings.enable_batch_operations {
            Ok(())
        } else {
            Err(SyncError::NoTarget("Batch canvas operations are disabled"))
        }
    }

    /// Surface a failure per the taxonomy: hard errors get a notice and a
    /// log entry, benign ones an informational toast
    fn surface_failure(&self, err: &SyncError) {
        match err {
            SyncError::Io(msg) => {
                error!(%msg, "canvas io failure");
                self.notifier.toast("Canvas operation failed. Try again later.");
            }
            SyncError::Malformed(e) => {
                error!(error = %e, "canvas file cannot be trusted for writing");
                self.notifier
                    .toast("Canvas file could not be parsed; it was left untouched.");
            }
            SyncError::SurfaceNotReady(_) => {
                self.notifier.toast("Canvas view is still loading. Try again.");
            }
            SyncError::NoTarget(msg) => {
                self.notifier.toast(msg);
            }
        }
    }
}
