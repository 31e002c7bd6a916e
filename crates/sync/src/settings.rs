//! Settings for the sync engine
//!
//! Mirrors the host settings store: a flat options object with defaults, so
//! a partial TOML file (or none at all) always yields a usable config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recognized options, all defaulted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Bind the engine to every canvas as it opens
    pub auto_activate_on_all_canvases: bool,
    /// Highlight the card for the focused document
    pub enable_highlighting: bool,
    pub show_navigation_hints: bool,
    /// Gate for create-from-batch and append operations
    pub enable_batch_operations: bool,
    /// Gate for the single "send this document to a canvas" action
    pub enable_send_tab_to_canvas: bool,
    /// Card edge length in canvas units
    pub card_size: u32,
    /// Gap between cards in canvas units
    pub card_spacing: u32,
    /// Vault folder new canvases are created in
    pub canvas_output_folder: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            auto_activate_on_all_canvases: true,
            enable_highlighting: true,
            show_navigation_hints: true,
            enable_batch_operations: true,
            enable_send_tab_to_canvas: true,
            card_size: 250,
            card_spacing: 50,
            canvas_output_folder: String::new(),
        }
    }
}

impl SyncSettings {
    /// Parse from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let mut settings: Self = toml::from_str(text)?;
        settings.canvas_output_folder = normalize_folder(&settings.canvas_output_folder);
        Ok(settings)
    }

    /// Load from a TOML file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Self::from_toml_str(&text).ok())
            .unwrap_or_default()
    }

    /// Vault path for a new canvas file in the configured output folder
    pub fn output_path(&self, filename: &str) -> String {
        format!("{}/{}", self.canvas_output_folder, filename)
    }

    pub fn card_size_f(&self) -> f64 {
        f64::from(self.card_size)
    }

    pub fn card_spacing_f(&self) -> f64 {
        f64::from(self.card_spacing)
    }
}

/// Normalize an output folder: leading `/`, no trailing `/`, root is empty
pub fn normalize_folder(folder: &str) -> String {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Wait/poll/settle budgets used by the binder, index, and mutation ops
///
/// Tests shrink these to the millisecond range; production uses the
/// defaults. Every wait in the system is bounded by one of these.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Interval between surface readiness probes
    pub ready_poll_interval: Duration,
    /// Ceiling for one readiness wait
    pub ready_timeout: Duration,
    /// Delay before the single index rebuild retry
    pub index_retry_delay: Duration,
    /// Settle delay after a canvas write, so the rendering surface's next
    /// read sees the update instead of racing it
    pub write_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            ready_poll_interval: Duration::from_millis(150),
            ready_timeout: Duration::from_secs(3),
            index_retry_delay: Duration::from_secs(1),
            write_settle: Duration::from_millis(500),
        }
    }
}

impl Timing {
    /// Millisecond-scale budgets for tests
    pub const fn fast() -> Self {
        Self {
            ready_poll_interval: Duration::from_millis(1),
            ready_timeout: Duration::from_millis(20),
            index_retry_delay: Duration::from_millis(1),
            write_settle: Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_conventions() {
        let s = SyncSettings::default();
        assert_eq!(s.card_size, 250);
        assert_eq!(s.card_spacing, 50);
        assert!(s.enable_highlighting);
        assert!(s.auto_activate_on_all_canvases);
    }

    #[test]
    fn folder_normalization() {
        assert_eq!(normalize_folder("canvases"), "/canvases");
        assert_eq!(normalize_folder("/canvases/"), "/canvases");
        assert_eq!(normalize_folder("a/b/"), "/a/b");
        assert_eq!(normalize_folder(""), "");
        assert_eq!(normalize_folder("/"), "");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = SyncSettings::from_toml_str("card_size = 300\ncanvas_output_folder = \"boards/\"")
            .unwrap();
        assert_eq!(s.card_size, 300);
        assert_eq!(s.canvas_output_folder, "/boards");
        assert_eq!(s.card_spacing, 50);
        assert!(s.enable_batch_operations);
    }

    #[test]
    fn bad_toml_falls_back_to_defaults() {
        let s = SyncSettings::load(Path::new("/nonexistent/cardboard.toml"));
        assert_eq!(s.card_size, 250);
    }

    #[test]
    fn output_path_joins_folder_and_name() {
        let mut s = SyncSettings::default();
        assert_eq!(s.output_path("Canvas-1.canvas"), "/Canvas-1.canvas");
        s.canvas_output_folder = normalize_folder("boards");
        assert_eq!(s.output_path("Canvas-1.canvas"), "/boards/Canvas-1.canvas");
    }
}
