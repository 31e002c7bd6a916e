// cardboard-sync library
// Keeps open documents and the cards of a live canvas surface in sync

// Collaborator seams implemented by the embedding host
pub mod notify;
pub mod surface;
pub mod workspace;

// Surface discovery and readiness
pub mod binder;

// Path -> card mapping per bound surface
pub mod index;

// Per-surface synchronization state machine
pub mod engine;

// Canvas creation and append operations
pub mod ops;

// Configuration
pub mod settings;

// Ephemeral per-canvas bookkeeping
pub mod tracker;

// Shared plumbing
pub mod error;
pub mod retry;

pub use engine::{BindState, SyncEngine};
pub use error::{Result, SyncError};
pub use notify::{CanvasChoice, Notifier, NullNotifier};
pub use ops::CanvasOps;
pub use settings::{SyncSettings, Timing};
pub use surface::{CanvasSurface, CardHandle, FileRef};
pub use tracker::CanvasInfoTracker;
pub use workspace::{OpenDocument, WorkspaceEvent, WorkspaceHost};
