//! File-node index
//!
//! The bidirectional mapping between document paths and the live cards of
//! one bound surface. Rebuilt wholesale on bind and whenever the surface's
//! node set changes shape; never trusted across a rebind. Entries may
//! reference documents that no longer exist (dangling) - they stay in the
//! index but resolve to nothing useful for highlighting.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::retry::retry_once;
use crate::settings::Timing;
use crate::surface::CanvasSurface;

/// Path -> card-ID mapping scoped to one surface
#[derive(Debug, Default)]
pub struct FileNodeIndex {
    by_path: HashMap<String, String>,
    /// Node count observed at rebuild time, used to detect shape changes
    node_count: usize,
}

impl FileNodeIndex {
    /// Extract a fresh index from the surface's rendered cards
    ///
    /// Cards without an extractable path are skipped, not errors; one
    /// card's bad reference never aborts the rest.
    pub fn rebuild(surface: &dyn CanvasSurface) -> Self {
        let mut by_path = HashMap::new();
        for card in surface.cards() {
            match card.file_ref.resolve() {
                Some(path) => {
                    by_path.insert(path.to_string(), card.id);
                }
                None => {
                    debug!(card = %card.id, "card has no extractable path, skipping");
                }
            }
        }
        Self {
            by_path,
            node_count: surface.node_count(),
        }
    }

    /// Card ID for a document path
    pub fn card_for(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Iterate `(document path, card id)` entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path.iter().map(|(p, id)| (p.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Node count the surface reported when this index was built
    pub fn indexed_node_count(&self) -> usize {
        self.node_count
    }
}

/// Rebuild, retrying once if the surface looks populated but yields nothing
///
/// An empty result against a non-zero node count usually means the surface
/// has not finished materializing its cards; one fixed-delay retry covers
/// that race. A second empty result is surfaced as a diagnostic and
/// accepted - a canvas of only non-file cards will never yield entries.
pub async fn rebuild_with_retry(surface: &Arc<dyn CanvasSurface>, timing: &Timing) -> FileNodeIndex {
    let index = retry_once(
        timing.index_retry_delay,
        || async { FileNodeIndex::rebuild(surface.as_ref()) },
        |index| !(index.is_empty() && surface.node_count() > 0),
    )
    .await;

    if index.is_empty() && surface.node_count() > 0 {
        warn!(
            canvas = %surface.path(),
            nodes = surface.node_count(),
            "index still empty after retry; giving up"
        );
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CardHandle, FileRef};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Surface backed by a fixed card list, counting `cards()` calls
    struct FixedSurface {
        cards: Vec<CardHandle>,
        node_count: usize,
        scans: AtomicUsize,
    }

    impl FixedSurface {
        fn new(cards: Vec<CardHandle>, node_count: usize) -> Self {
            Self {
                cards,
                node_count,
                scans: AtomicUsize::new(0),
            }
        }
    }

    impl CanvasSurface for FixedSurface {
        fn path(&self) -> String {
            "Board.canvas".to_string()
        }

        fn is_ready(&self) -> bool {
            true
        }

        fn node_count(&self) -> usize {
            self.node_count
        }

        fn cards(&self) -> Vec<CardHandle> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.cards.clone()
        }

        fn set_highlighted(&self, _card_id: &str, _on: bool) {}
        fn set_background_open(&self, _card_id: &str, _on: bool) {}
        fn clear_marks(&self) {}
    }

    fn card(id: &str, file_ref: FileRef) -> CardHandle {
        CardHandle {
            id: id.to_string(),
            file_ref,
        }
    }

    #[test]
    fn unextractable_cards_are_skipped_not_errors() {
        let surface = FixedSurface::new(
            vec![
                card("a", FileRef::Path("a.md".into())),
                card("b", FileRef::FileObject { path: "b.md".into() }),
                card("c", FileRef::Missing),
            ],
            3,
        );

        let index = FileNodeIndex::rebuild(&surface);

        assert_eq!(index.len(), 2);
        assert_eq!(index.card_for("a.md"), Some("a"));
        assert_eq!(index.card_for("b.md"), Some("b"));
        assert_eq!(index.card_for("c.md"), None);
    }

    #[tokio::test]
    async fn retry_scan_count_is_bounded_at_two() {
        let fixed = Arc::new(FixedSurface::new(Vec::new(), 3));
        let surface: Arc<dyn CanvasSurface> = fixed.clone();

        let index = rebuild_with_retry(&surface, &Timing::fast()).await;

        assert!(index.is_empty());
        assert_eq!(fixed.scans.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn genuinely_empty_surface_does_not_retry() {
        let fixed = Arc::new(FixedSurface::new(Vec::new(), 0));
        let surface: Arc<dyn CanvasSurface> = fixed.clone();

        let index = rebuild_with_retry(&surface, &Timing::fast()).await;

        assert!(index.is_empty());
        assert_eq!(fixed.scans.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn populated_rebuild_does_not_retry() {
        let fixed = Arc::new(FixedSurface::new(
            vec![card("a", FileRef::Path("a.md".into()))],
            1,
        ));
        let surface: Arc<dyn CanvasSurface> = fixed.clone();

        let index = rebuild_with_retry(&surface, &Timing::fast()).await;

        assert_eq!(index.len(), 1);
        assert_eq!(fixed.scans.load(Ordering::SeqCst), 1);
    }
}
