//! Canvas view binder
//!
//! The host creates and populates a canvas surface asynchronously; attaching
//! behavior before its data representation exists loses events. The binder
//! locates the surface for a canvas path and polls its readiness with a
//! bounded budget. "Not ready" is a soft outcome: callers skip dependent
//! setup, they do not crash.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use crate::settings::Timing;
use crate::surface::CanvasSurface;
use crate::workspace::WorkspaceHost;

/// Locate the live surface for a canvas path; `None` is not an error
pub async fn find_surface_for(
    host: &dyn WorkspaceHost,
    canvas_path: &str,
) -> Option<Arc<dyn CanvasSurface>> {
    host.find_canvas_surface(canvas_path).await
}

/// Poll until the surface reports ready or the budget expires
///
/// Returns `false` on timeout without erroring. An in-flight poll interval
/// always completes; abandonment means the caller stops awaiting.
pub async fn await_ready(surface: &dyn CanvasSurface, timing: &Timing) -> bool {
    let deadline = Instant::now() + timing.ready_timeout;
    loop {
        if surface.is_ready() {
            return true;
        }
        if Instant::now() >= deadline {
            debug!(
                canvas = %surface.path(),
                timeout_ms = timing.ready_timeout.as_millis(),
                "surface readiness wait timed out"
            );
            return false;
        }
        tokio::time::sleep(timing.ready_poll_interval).await;
    }
}
