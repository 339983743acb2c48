//! Virtualized list windowing.
//!
//! The entry sequence stays in one contiguous store; a renderer only ever
//! receives the `[start, end)` slice that intersects the viewport.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Fixed-height row layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListWindow {
    /// Height of one row in pixels.
    pub row_height: f64,
    /// Extra rows materialized above and below the viewport.
    pub overscan: usize,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            overscan: 5,
        }
    }
}

impl ListWindow {
    pub fn new(row_height: f64, overscan: usize) -> Self {
        Self {
            row_height,
            overscan,
        }
    }

    /// Indices of rows to materialize, computed from the scroll offset alone.
    pub fn visible_range(&self, scroll_offset: f64, viewport_height: f64, len: usize) -> Range<usize> {
        if len == 0 || self.row_height <= 0.0 || viewport_height <= 0.0 {
            return 0..0;
        }

        let offset = scroll_offset.max(0.0);
        let first = (offset / self.row_height).floor() as usize;
        let last = ((offset + viewport_height) / self.row_height).ceil() as usize;

        let start = first.saturating_sub(self.overscan).min(len);
        let end = last.saturating_add(self.overscan).min(len);
        start..end
    }

    /// The rows of `items` to hand to a renderer.
    pub fn slice<'a, T>(&self, items: &'a [T], scroll_offset: f64, viewport_height: f64) -> &'a [T] {
        &items[self.visible_range(scroll_offset, viewport_height, items.len())]
    }

    /// Total scrollable height for `len` rows.
    pub fn content_height(&self, len: usize) -> f64 {
        len as f64 * self.row_height
    }

    /// Top offset of row `index`.
    pub fn row_offset(&self, index: usize) -> f64 {
        index as f64 * self.row_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_with_overscan() {
        let window = ListWindow::new(20.0, 2);
        // rows 50..55 are in view
        assert_eq!(window.visible_range(1000.0, 100.0, 10_000), 48..57);
        assert_eq!(window.visible_range(0.0, 100.0, 10_000), 0..7);
    }

    #[test]
    fn test_visible_range_clamps_to_len() {
        let window = ListWindow::new(20.0, 2);
        assert_eq!(window.visible_range(1000.0, 100.0, 52), 48..52);
        assert_eq!(window.visible_range(5000.0, 100.0, 10), 10..10);
        assert_eq!(window.visible_range(0.0, 100.0, 0), 0..0);
    }

    #[test]
    fn test_slice() {
        let rows: Vec<usize> = (0..100).collect();
        let window = ListWindow::new(10.0, 0);
        assert_eq!(window.slice(&rows, 95.0, 20.0), &rows[9..12]);
    }
}
