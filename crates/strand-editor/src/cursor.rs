//! Cursor — position tracking with movement and a preferred column.
//!
//! The `Cursor` tracks a `(row, col)` position and the column the user last
//! chose on purpose. It knows nothing about ropes: movement methods take any
//! [`LineLengths`] so the document (or a test) can supply line lengths.
//!
//! # Preferred column
//!
//! When moving vertically, the cursor lands on `min(preferred_col, len)`.
//! Passing through a short line therefore doesn't lose the horizontal
//! position; reaching a long line again snaps back to it. Horizontal moves
//! and explicit repositioning update the preferred column; vertical moves
//! never do.
//!
//! # Boundary wrap
//!
//! `move_left` at column 0 goes to the end of the previous line and
//! `move_right` at the end of a line goes to column 0 of the next. At the
//! first/last line both are no-ops.

/// Line geometry the cursor needs to move and clamp.
pub trait LineLengths {
    /// Number of lines; at least 1.
    fn line_count(&self) -> usize;

    /// Char length of `row`, or 0 past the end.
    fn line_len(&self, row: usize) -> usize;
}

/// A cursor in a document.
///
/// Lightweight value type. Does not own or reference the text; line
/// lengths are passed to the movement methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    row: usize,
    col: usize,

    /// Column to aim for on vertical moves.
    preferred_col: usize,
}

impl Cursor {
    /// A cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            preferred_col: 0,
        }
    }

    /// A cursor at `(row, col)`.
    #[must_use]
    pub const fn at(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            preferred_col: col,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// The column vertical moves aim for.
    #[inline]
    #[must_use]
    pub const fn preferred_col(&self) -> usize {
        self.preferred_col
    }

    // -- Positioning --------------------------------------------------------

    /// Move to `(row, col)` and make `col` the preferred column.
    ///
    /// No bounds check happens here; follow with [`clamp`](Self::clamp).
    pub const fn set_position(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
        self.preferred_col = col;
    }

    /// Pull the cursor back inside the text: `row < line_count` and
    /// `col <= line_len(row)`. Leaves the preferred column alone.
    pub fn clamp(&mut self, lines: &(impl LineLengths + ?Sized)) {
        let last = lines.line_count().saturating_sub(1);
        self.row = self.row.min(last);
        self.col = self.col.min(lines.line_len(self.row));
    }

    // -- Movement -----------------------------------------------------------

    /// One char left, wrapping to the end of the previous line.
    pub fn move_left(&mut self, lines: &(impl LineLengths + ?Sized)) {
        self.clamp(lines);
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = lines.line_len(self.row);
        }
        self.preferred_col = self.col;
    }

    /// One char right, wrapping to the start of the next line.
    pub fn move_right(&mut self, lines: &(impl LineLengths + ?Sized)) {
        self.clamp(lines);
        if self.col < lines.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < lines.line_count() {
            self.row += 1;
            self.col = 0;
        }
        self.preferred_col = self.col;
    }

    /// One line up, aiming for the preferred column.
    pub fn move_up(&mut self, lines: &(impl LineLengths + ?Sized)) {
        self.clamp(lines);
        self.row = self.row.saturating_sub(1);
        self.col = self.preferred_col.min(lines.line_len(self.row));
    }

    /// One line down, aiming for the preferred column.
    pub fn move_down(&mut self, lines: &(impl LineLengths + ?Sized)) {
        self.clamp(lines);
        if self.row + 1 < lines.line_count() {
            self.row += 1;
        }
        self.col = self.preferred_col.min(lines.line_len(self.row));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
