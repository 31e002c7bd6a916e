//! Canvas surface handles
//!
//! A surface is the host's live rendered view of one canvas file. It is
//! created and populated asynchronously by the host, may be torn down and
//! recreated at any time, and is therefore modeled as an opaque capability
//! trait that the engine discovers fresh on every bind - never cached.

/// How a rendered card stores its document reference
///
/// Two historical record shapes exist: a plain path string, and a nested
/// file object carrying the path. [`FileRef::resolve`] is the single
/// normalization point; everything reading a card's reference goes through
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRef {
    /// Direct string path field
    Path(String),
    /// Nested file object with a path field
    FileObject { path: String },
    /// No extractable reference (non-file card, or a half-initialized one)
    Missing,
}

impl FileRef {
    /// The referenced document path, if one can be extracted
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Path(path) | Self::FileObject { path } if !path.is_empty() => {
                Some(path.as_str())
            }
            _ => None,
        }
    }
}

/// A live card inside a surface, addressed by its node ID
#[derive(Debug, Clone)]
pub struct CardHandle {
    pub id: String,
    pub file_ref: FileRef,
}

/// Live rendering surface for one canvas file
///
/// Implemented by the embedding host. Mark operations are cheap view-state
/// toggles; they must be idempotent because the engine re-derives the full
/// mark set on every focus change.
pub trait CanvasSurface: Send + Sync {
    /// Vault path of the canvas file this surface renders
    fn path(&self) -> String;

    /// True once the surface's internal data representation is loaded and
    /// its node collection is queryable
    fn is_ready(&self) -> bool;

    /// Total rendered node count (all kinds, not just file cards)
    fn node_count(&self) -> usize;

    /// Snapshot of the rendered cards
    fn cards(&self) -> Vec<CardHandle>;

    /// Toggle the active-highlight mark on one card
    fn set_highlighted(&self, card_id: &str, on: bool);

    /// Toggle the background-open mark on one card
    fn set_background_open(&self, card_id: &str, on: bool);

    /// Remove every mark this engine manages
    fn clear_marks(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_handles_both_shapes() {
        assert_eq!(FileRef::Path("a.md".into()).resolve(), Some("a.md"));
        assert_eq!(FileRef::FileObject { path: "b.md".into() }.resolve(), Some("b.md"));
        assert_eq!(FileRef::Missing.resolve(), None);
    }

    #[test]
    fn empty_paths_do_not_resolve() {
        assert_eq!(FileRef::Path(String::new()).resolve(), None);
        assert_eq!(FileRef::FileObject { path: String::new() }.resolve(), None);
    }
}
