//! Per-canvas info tracker
//!
//! Process-lifetime bookkeeping only: the last viewport focus point and
//! last-modified instant per canvas path. Used to suggest an insertion
//! point for new cards and to order the canvas picker. Never persisted.

use std::collections::HashMap;
use std::sync::Mutex;

use cardboard_canvas::Point;
use chrono::{DateTime, Utc};

use crate::notify::CanvasChoice;

#[derive(Debug, Clone)]
struct CanvasInfo {
    last_focus: Option<Point>,
    last_modified: DateTime<Utc>,
}

/// Ephemeral per-canvas metadata, keyed by vault path
#[derive(Debug, Default)]
pub struct CanvasInfoTracker {
    inner: Mutex<HashMap<String, CanvasInfo>>,
}

impl CanvasInfoTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a canvas was just modified
    pub fn touch(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner.entry(path.to_string()).or_insert(CanvasInfo {
            last_focus: None,
            last_modified: Utc::now(),
        });
        entry.last_modified = Utc::now();
    }

    /// Record the last observed viewport focus point for a canvas
    pub fn record_focus(&self, path: &str, point: Point) {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner.entry(path.to_string()).or_insert(CanvasInfo {
            last_focus: None,
            last_modified: Utc::now(),
        });
        entry.last_focus = Some(point);
    }

    /// Last focus point for a canvas, if one was observed
    pub fn focus_of(&self, path: &str) -> Option<Point> {
        self.inner.lock().unwrap().get(path).and_then(|i| i.last_focus)
    }

    /// Tracked canvases as picker choices, most recently modified first
    pub fn choices(&self) -> Vec<CanvasChoice> {
        let inner = self.inner.lock().unwrap();
        let mut choices: Vec<CanvasChoice> = inner
            .iter()
            .map(|(path, info)| CanvasChoice {
                path: path.clone(),
                name: display_name(path),
                last_modified: info.last_modified,
            })
            .collect();
        choices.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        choices
    }
}

/// Basename without the `.canvas` extension
fn display_name(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.strip_suffix(".canvas").unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_roundtrip() {
        let tracker = CanvasInfoTracker::new();
        assert_eq!(tracker.focus_of("/a.canvas"), None);

        tracker.record_focus("/a.canvas", Point::new(10.0, 20.0));
        assert_eq!(tracker.focus_of("/a.canvas"), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn choices_sorted_most_recent_first() {
        let tracker = CanvasInfoTracker::new();
        tracker.touch("/old.canvas");
        std::thread::sleep(std::time::Duration::from_millis(5));
        tracker.touch("/new.canvas");

        let choices = tracker.choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].path, "/new.canvas");
        assert_eq!(choices[0].name, "new");
    }

    #[test]
    fn display_name_strips_folder_and_extension() {
        assert_eq!(display_name("/boards/My Board.canvas"), "My Board");
        assert_eq!(display_name("plain.canvas"), "plain");
        assert_eq!(display_name("noext"), "noext");
    }
}
