//! Card placement planner
//!
//! Pure layout arithmetic: a square-ish grid for batches, and a drop-below
//! point for single insertions near the last viewport focus.

/// Default vertical drop below the remembered focus point
pub const DEFAULT_SINGLE_INSERTION_DROP: f64 = 300.0;

/// A canvas-local coordinate (not screen pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by another point
    pub fn offset(self, by: Self) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// Plan non-overlapping grid positions for `count` cards
///
/// Cards are arranged in `ceil(sqrt(count))` columns; output order matches
/// input index order. Deterministic for identical arguments.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn plan_grid(count: usize, width: f64, height: f64, spacing: f64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let columns = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            Point {
                x: col as f64 * (width + spacing),
                y: row as f64 * (height + spacing),
            }
        })
        .collect()
}

/// Plan an insertion point for a single new card
///
/// Drops below the last focus point when one is remembered, else the origin.
pub fn plan_single_insertion(last_focus: Option<Point>, vertical_offset: f64) -> Point {
    last_focus.map_or_else(Point::default, |p| Point {
        x: p.x,
        y: p.y + vertical_offset,
    })
}
