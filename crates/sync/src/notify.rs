//! User-facing notification and selection surface
//!
//! Toasts and the canvas picker are host primitives; the engine only needs
//! this narrow seam. Ordering of picker entries is the caller's duty
//! (most-recently-modified first).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One entry of the canvas picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasChoice {
    /// Vault path of the canvas file
    pub path: String,
    /// Display name (basename without extension)
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

/// Host notification primitives consumed by the engine
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a transient toast message
    fn toast(&self, message: &str);

    /// Single-choice filterable picker; returns the chosen canvas path
    async fn pick_canvas(&self, choices: Vec<CanvasChoice>) -> Option<String>;
}

/// Notifier that drops everything; for headless and test use
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    fn toast(&self, _message: &str) {}

    async fn pick_canvas(&self, choices: Vec<CanvasChoice>) -> Option<String> {
        // Headless fallback: take the most recent choice
        choices.into_iter().next().map(|c| c.path)
    }
}
