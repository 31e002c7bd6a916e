use std::time::Duration;

use thiserror::Error;

/// Failure taxonomy for sync operations
///
/// `SurfaceNotReady` and `NoTarget` are soft: passive flows log and skip,
/// user-initiated flows surface a notice. `Io` and `Malformed` are always
/// surfaced; a file that cannot be parsed is never written back.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Canvas file content cannot be trusted for a write
    #[error(transparent)]
    Malformed(#[from] cardboard_canvas::CanvasError),

    /// Storage collaborator failed a create/read/write
    #[error("vault io failure: {0}")]
    Io(String),

    /// Readiness wait exceeded its timeout
    #[error("canvas surface not ready within {0:?}")]
    SurfaceNotReady(Duration),

    /// Nothing to operate on (zero documents, zero canvases); benign
    #[error("{0}")]
    NoTarget(&'static str),
}

impl SyncError {
    /// Wrap a vault error with path context
    pub fn io(path: &str, err: &anyhow::Error) -> Self {
        Self::Io(format!("{path}: {err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
