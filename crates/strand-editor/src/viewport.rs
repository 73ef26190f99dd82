//! Viewport — scroll offsets and margin-based scrolling.
//!
//! A `Viewport` describes which part of the document is on screen: the
//! origin (`scroll_y` rows down, `scroll_x` columns across) and the size in
//! rows and columns. The renderer sets the size; the document moves the
//! origin after every edit or cursor move.
//!
//! # Margin scrolling
//!
//! The viewport only scrolls when the cursor enters a band of `margin` rows
//! (or columns) along an edge, and then only as far as needed to get it out
//! of the band again. It never recenters. With a margin of 3 and 10 rows,
//! the cursor may roam rows `scroll_y + 3 ..= scroll_y + 6` freely.
//!
//! ```text
//!   scroll_y ──▶ ┌────────────┐
//!                │ margin     │
//!                ├────────────┤
//!                │ free band  │ ← cursor moves here without scrolling
//!                ├────────────┤
//!                │ margin     │
//!                └────────────┘
//! ```
//!
//! A margin too large for the viewport is reduced to `(size - 1) / 2` so the
//! free band never vanishes. Offsets never go below zero.

use strand_rope::Rope;

/// Smallest row count a renderer may set.
pub const MIN_ROWS: usize = 1;

/// Smallest column count a renderer may set.
pub const MIN_COLS: usize = 10;

/// The visible window onto a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    scroll_x: usize,
    scroll_y: usize,
    rows: usize,
    cols: usize,
    margin: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(24, 80, 0)
    }
}

impl Viewport {
    /// A viewport at the origin. Sizes below [`MIN_ROWS`] / [`MIN_COLS`] are
    /// raised to the minimum.
    #[must_use]
    pub fn new(rows: usize, cols: usize, margin: usize) -> Self {
        Self {
            scroll_x: 0,
            scroll_y: 0,
            rows: rows.max(MIN_ROWS),
            cols: cols.max(MIN_COLS),
            margin,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// First visible column.
    #[inline]
    #[must_use]
    pub const fn scroll_x(&self) -> usize {
        self.scroll_x
    }

    /// First visible row.
    #[inline]
    #[must_use]
    pub const fn scroll_y(&self) -> usize {
        self.scroll_y
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub const fn margin(&self) -> usize {
        self.margin
    }

    // -- Configuration ------------------------------------------------------

    /// Resize, raising values below the minimums.
    pub fn set_size(&mut self, rows: usize, cols: usize) {
        self.rows = rows.max(MIN_ROWS);
        self.cols = cols.max(MIN_COLS);
    }

    pub const fn set_margin(&mut self, margin: usize) {
        self.margin = margin;
    }

    /// Jump back to the top-left corner.
    pub const fn reset_scroll(&mut self) {
        self.scroll_x = 0;
        self.scroll_y = 0;
    }

    // -- Scrolling ----------------------------------------------------------

    /// Shift the origin the minimum amount that keeps `(row, col)` outside
    /// the margin bands.
    pub fn ensure_visible(&mut self, row: usize, col: usize) {
        self.scroll_y = scroll_axis(self.scroll_y, row, self.rows, self.margin);
        self.scroll_x = scroll_axis(self.scroll_x, col, self.cols, self.margin);
    }

    /// Screen cell of `(row, col)` relative to the viewport origin, or `None`
    /// if the position is off screen.
    #[must_use]
    pub fn screen_position(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let y = row.checked_sub(self.scroll_y)?;
        let x = col.checked_sub(self.scroll_x)?;
        (y < self.rows && x < self.cols).then_some((x, y))
    }

    /// The text a renderer should draw: at most `rows` lines starting at
    /// `scroll_y`, each cut to the columns `scroll_x .. scroll_x + cols`.
    #[must_use]
    pub fn visible_window(&self, lines: &[Rope]) -> Vec<String> {
        lines
            .iter()
            .skip(self.scroll_y)
            .take(self.rows)
            .map(|line| line.slice_text(self.scroll_x, self.scroll_x + self.cols))
            .collect()
    }
}

/// New offset along one axis so that `pos` sits in `[offset + m, offset + size - m)`.
fn scroll_axis(offset: usize, pos: usize, size: usize, margin: usize) -> usize {
    let m = margin.min(size.saturating_sub(1) / 2);
    if pos < offset + m {
        pos.saturating_sub(m)
    } else if pos + m >= offset + size {
        pos + m + 1 - size
    } else {
        offset
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ──────────────────────────────────────────────────────

    #[test]
    fn new_defaults() {
        let v = Viewport::default();
        assert_eq!((v.scroll_x(), v.scroll_y()), (0, 0));
        assert_eq!((v.rows(), v.cols()), (24, 80));
    }

    #[test]
    fn sizes_have_minimums() {
        let mut v = Viewport::new(0, 3, 2);
        assert_eq!((v.rows(), v.cols()), (1, 10));
        v.set_size(0, 0);
        assert_eq!((v.rows(), v.cols()), (1, 10));
        v.set_size(40, 120);
        assert_eq!((v.rows(), v.cols()), (40, 120));
    }

    // ── ensure_visible ────────────────────────────────────────────────────

    #[test]
    fn no_scroll_inside_free_band() {
        let mut v = Viewport::new(10, 20, 3);
        v.ensure_visible(5, 5);
        assert_eq!((v.scroll_y(), v.scroll_x()), (0, 0));
    }

    #[test]
    fn scroll_down_into_bottom_margin() {
        let mut v = Viewport::new(10, 20, 3);
        // Row 7 is inside the bottom margin (rows 7..10).
        v.ensure_visible(7, 0);
        assert_eq!(v.scroll_y(), 1);
        // Moving one more row scrolls exactly one more.
        v.ensure_visible(8, 0);
        assert_eq!(v.scroll_y(), 2);
    }

    #[test]
    fn scroll_up_into_top_margin() {
        let mut v = Viewport::new(10, 20, 3);
        v.ensure_visible(50, 0);
        assert_eq!(v.scroll_y(), 44);
        v.ensure_visible(46, 0);
        assert_eq!(v.scroll_y(), 43);
    }

    #[test]
    fn scroll_never_negative_at_top() {
        let mut v = Viewport::new(10, 20, 3);
        v.ensure_visible(20, 0);
        v.ensure_visible(1, 0);
        assert_eq!(v.scroll_y(), 0);
    }

    #[test]
    fn horizontal_is_symmetric() {
        let mut v = Viewport::new(10, 20, 3);
        v.ensure_visible(0, 17);
        assert_eq!(v.scroll_x(), 1);
        v.ensure_visible(0, 2);
        assert_eq!(v.scroll_x(), 0);
    }

    #[test]
    fn jump_far_away_keeps_margin() {
        let mut v = Viewport::new(10, 20, 3);
        v.ensure_visible(100, 0);
        // Cursor ends on the last free row: 100 == scroll_y + 10 - 3 - 1.
        assert_eq!(v.scroll_y(), 94);
        assert_eq!(v.screen_position(100, 0), Some((0, 6)));
    }

    #[test]
    fn oversized_margin_shrinks() {
        let mut v = Viewport::new(1, 10, 3);
        v.ensure_visible(5, 0);
        assert_eq!(v.scroll_y(), 5);
        assert_eq!(v.screen_position(5, 0), Some((0, 0)));

        let mut v = Viewport::new(4, 10, 3);
        v.ensure_visible(9, 0);
        // Effective margin (4 - 1) / 2 = 1.
        assert_eq!(v.scroll_y(), 7);
    }

    #[test]
    fn zero_margin_scrolls_at_edge() {
        let mut v = Viewport::new(5, 10, 0);
        v.ensure_visible(4, 9);
        assert_eq!((v.scroll_y(), v.scroll_x()), (0, 0));
        v.ensure_visible(5, 10);
        assert_eq!((v.scroll_y(), v.scroll_x()), (1, 1));
    }

    // ── screen_position ───────────────────────────────────────────────────

    #[test]
    fn screen_position_offscreen() {
        let mut v = Viewport::new(5, 10, 0);
        v.ensure_visible(20, 0);
        assert_eq!(v.screen_position(0, 0), None);
        assert_eq!(v.screen_position(20, 0), Some((0, 4)));
        assert_eq!(v.screen_position(20, 10), None);
    }

    // ── visible_window ────────────────────────────────────────────────────

    #[test]
    fn visible_window_slices_rows_and_cols() {
        let lines: Vec<Rope> = ["zero", "one two three four", "two", "three"]
            .into_iter()
            .map(Rope::from)
            .collect();
        let mut v = Viewport::new(2, 10, 0);
        v.ensure_visible(2, 13);
        assert_eq!((v.scroll_y(), v.scroll_x()), (1, 4));
        assert_eq!(
            v.visible_window(&lines),
            vec!["two three ".to_string(), String::new()]
        );
    }

    #[test]
    fn visible_window_past_end_is_short() {
        let lines = vec![Rope::from("only")];
        let v = Viewport::new(5, 10, 0);
        assert_eq!(v.visible_window(&lines), vec!["only".to_string()]);
    }

    #[test]
    fn reset_scroll() {
        let mut v = Viewport::new(5, 10, 0);
        v.ensure_visible(30, 30);
        v.reset_scroll();
        assert_eq!((v.scroll_y(), v.scroll_x()), (0, 0));
    }
}
