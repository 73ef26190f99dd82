//! Document — lines of ropes, a cursor, a viewport, and undo history.
//!
//! A `Document` turns editing intents (type a char, backspace, Enter, move)
//! into rope operations on one line at a time, then re-clamps the cursor and
//! scrolls the viewport so both are valid before anything else runs.
//!
//! # Design choices
//!
//! - **One rope per line.** Line breaks are never stored inside a rope; they
//!   are the boundaries between elements of `lines`. There is always at
//!   least one line.
//!
//! - **Snapshots are free.** [`save_state`](Document::save_state) clones the
//!   line handles, which copies one `Arc` per line and no text. Undo and
//!   redo swap those handles back in.
//!
//! - **Snapshots are caller-driven.** `save_state` must be called *before* a
//!   mutating operation; the edit methods never record history on their
//!   own. [`Dispatcher`](crate::action::Dispatcher) wraps this so input
//!   handling can't forget it.
//!
//! - **Periodic rebalancing.** Every effective edit bumps a counter; when it
//!   reaches [`Options::rebalance_threshold`] every line is rebalanced and
//!   the counter resets. A line that fails to rebalance keeps its old rope
//!   and the failure is logged.
//!
//! - **LF only.** Loading splits on `'\n'`; a trailing `'\n'` produces a
//!   final empty line. Saving joins with `'\n'` and adds nothing at the end,
//!   so LF files round-trip exactly. A `'\r'` before the `'\n'` stays in the
//!   line as an ordinary char.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strand_rope::Rope;
use tracing::{debug, info, warn};

use crate::cursor::{Cursor, LineLengths};
use crate::history::{History, Snapshot};
use crate::options::Options;
use crate::viewport::Viewport;

impl LineLengths for [Rope] {
    fn line_count(&self) -> usize {
        self.len().max(1)
    }

    fn line_len(&self, row: usize) -> usize {
        self.get(row).map_or(0, Rope::len)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An editable multi-line text document.
#[derive(Debug)]
pub struct Document {
    lines: Vec<Rope>,
    cursor: Cursor,
    viewport: Viewport,
    history: History,

    /// Effective edits since the last rebalance.
    edit_counter: usize,

    options: Options,
    path: Option<PathBuf>,
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// An empty document (one empty line) with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// An empty document with the given options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        let mut history = History::new();
        history.set_limit(options.history_limit);
        Self {
            lines: vec![Rope::with_max_leaf("", options.max_leaf)],
            cursor: Cursor::new(),
            viewport: Viewport::new(24, 80, options.scroll_margin),
            history,
            edit_counter: 0,
            options,
            path: None,
            modified: false,
        }
    }

    /// A document holding `text`, split into lines.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.load_str(text);
        doc
    }

    /// Load a document from a file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error unchanged if the file can't be read or isn't
    /// valid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let mut doc = Self::new();
        doc.load(path)?;
        Ok(doc)
    }

    // -- Text access --------------------------------------------------------

    /// The line ropes, top to bottom. Never empty.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[Rope] {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The rope for `row`, or `None` past the end.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Rope> {
        self.lines.get(row)
    }

    /// The text of `row`, or `None` past the end.
    #[must_use]
    pub fn line_text(&self, row: usize) -> Option<String> {
        self.lines.get(row).map(Rope::text)
    }

    /// Char length of `row`; 0 past the end.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.line_len(row)
    }

    /// Every line as a `String`, for renderers.
    #[must_use]
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Rope::text).collect()
    }

    /// The whole document as it would be saved: lines joined with `'\n'`.
    #[must_use]
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for (row, line) in self.lines.iter().enumerate() {
            if row > 0 {
                out.push('\n');
            }
            for chunk in line.leaves() {
                out.push_str(chunk);
            }
        }
        out
    }

    // -- State access -------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Effective edits since the last rebalance.
    #[inline]
    #[must_use]
    pub const fn edit_counter(&self) -> usize {
        self.edit_counter
    }

    /// The file this document was loaded from or last saved to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the path used by [`write`](Self::write).
    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True if the text changed since the last load or save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_count()
    }

    // -- Configuration ------------------------------------------------------

    /// Replace the options. Existing lines adopt the new leaf threshold for
    /// future inserts; the viewport and history pick up the new margin and
    /// limit immediately.
    pub fn set_options(&mut self, options: Options) {
        if options.max_leaf != self.options.max_leaf {
            for line in &mut self.lines {
                *line = line.with_leaf_threshold(options.max_leaf);
            }
        }
        self.viewport.set_margin(options.scroll_margin);
        self.history.set_limit(options.history_limit);
        self.options = options;
        self.finalize_edit();
    }

    /// Resize the viewport. Rows below 1 and columns below 10 are raised.
    pub fn set_viewport_size(&mut self, rows: usize, cols: usize) {
        self.viewport.set_size(rows, cols);
        self.viewport
            .ensure_visible(self.cursor.row(), self.cursor.col());
    }

    /// The visible part of the document, one string per screen row.
    #[must_use]
    pub fn visible_window(&self) -> Vec<String> {
        self.viewport.visible_window(&self.lines)
    }

    /// Cursor cell relative to the viewport, or `None` if off screen.
    #[must_use]
    pub fn cursor_screen_position(&self) -> Option<(usize, usize)> {
        self.viewport
            .screen_position(self.cursor.row(), self.cursor.col())
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` at the cursor and move past it.
    ///
    /// A `'\n'` splits the line instead, since lines never contain breaks.
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line_at_cursor();
            return;
        }
        self.cursor.clamp(self.lines.as_slice());
        let (row, col) = (self.cursor.row(), self.cursor.col());
        let mut buf = [0_u8; 4];
        self.lines[row] = self.lines[row].insert(col, ch.encode_utf8(&mut buf));
        self.cursor.set_position(row, col + 1);
        debug!(row, col, %ch, "inserted char");
        self.note_edit();
        self.finalize_edit();
    }

    /// Delete the char before the cursor, or join with the previous line when
    /// the cursor is at column 0. Does nothing at the very start.
    pub fn backspace_at_cursor(&mut self) {
        self.cursor.clamp(self.lines.as_slice());
        let (row, col) = (self.cursor.row(), self.cursor.col());

        if col > 0 {
            self.lines[row] = self.lines[row].delete(col - 1, col);
            self.cursor.set_position(row, col - 1);
            debug!(row, col = col - 1, "deleted char");
        } else if row > 0 {
            let current = self.lines.remove(row);
            let prev_len = self.lines[row - 1].len();
            self.lines[row - 1] = self.lines[row - 1].concat(&current);
            self.cursor.set_position(row - 1, prev_len);
            debug!(from = row, into = row - 1, "joined lines");
        } else {
            return;
        }

        self.note_edit();
        self.finalize_edit();
    }

    /// Break the current line at the cursor. The text after the cursor moves
    /// to a new line below, and the cursor goes to its start.
    pub fn split_line_at_cursor(&mut self) {
        self.cursor.clamp(self.lines.as_slice());
        let (row, col) = (self.cursor.row(), self.cursor.col());
        let (left, right) = self.lines[row].split(col);
        self.lines[row] = left;
        self.lines.insert(row + 1, right);
        self.cursor.set_position(row + 1, 0);
        debug!(row, col, "split line");
        self.note_edit();
        self.finalize_edit();
    }

    // -- Movement -----------------------------------------------------------

    pub fn move_left(&mut self) {
        self.cursor.move_left(self.lines.as_slice());
        self.finalize_edit();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right(self.lines.as_slice());
        self.finalize_edit();
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up(self.lines.as_slice());
        self.finalize_edit();
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down(self.lines.as_slice());
        self.finalize_edit();
    }

    /// Jump to `(row, col)`, clamped into the document. The clamped column
    /// becomes the preferred column for vertical moves.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor.set_position(row, col);
        self.cursor.clamp(self.lines.as_slice());
        let (row, col) = (self.cursor.row(), self.cursor.col());
        self.cursor.set_position(row, col);
        self.finalize_edit();
    }

    // -- Undo / redo --------------------------------------------------------

    /// Record the current lines and cursor on the undo stack and clear the
    /// redo stack. Call this *before* a mutating operation.
    pub fn save_state(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
        debug!(depth = self.history.undo_count(), "state saved");
    }

    /// Restore the most recent saved state. Returns `false` (and changes
    /// nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        info!(
            undo = self.history.undo_count(),
            redo = self.history.redo_count(),
            "undo applied"
        );
        true
    }

    /// Re-apply the most recently undone state. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        info!(
            undo = self.history.undo_count(),
            redo = self.history.redo_count(),
            "redo applied"
        );
        true
    }

    // -- Rebalancing --------------------------------------------------------

    /// Rebalance every line and reset the edit counter. Returns how many
    /// lines could not be rebalanced; those keep their current rope.
    pub fn rebalance_all(&mut self) -> usize {
        info!(
            edits = self.edit_counter,
            lines = self.lines.len(),
            "rebalancing all lines"
        );
        let mut failures = 0;
        for (row, line) in self.lines.iter_mut().enumerate() {
            match line.try_rebalance() {
                Ok(balanced) => *line = balanced,
                Err(err) => {
                    failures += 1;
                    warn!(row, %err, "rebalance failed, keeping existing rope");
                }
            }
        }
        self.edit_counter = 0;
        failures
    }

    // -- File I/O -----------------------------------------------------------

    /// Replace the document with the contents of `path`.
    ///
    /// # Errors
    ///
    /// The I/O error from reading the file, unchanged. The document is left
    /// as it was.
    pub fn load(&mut self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        self.load_str(&text);
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), lines = self.lines.len(), "loaded file");
        Ok(())
    }

    /// Replace the document with `text`. Resets the cursor, scroll position,
    /// history, edit counter, and modified flag.
    pub fn load_str(&mut self, text: &str) {
        let max_leaf = self.options.max_leaf;
        self.lines = text
            .split('\n')
            .map(|line| Rope::with_max_leaf(line, max_leaf))
            .collect();
        self.cursor = Cursor::new();
        self.viewport.reset_scroll();
        self.history.clear();
        self.edit_counter = 0;
        self.modified = false;
    }

    /// Write the document to `path` and remember it as the document's path.
    ///
    /// # Errors
    ///
    /// The I/O error from writing the file, unchanged.
    pub fn save(&mut self, path: &Path) -> io::Result<()> {
        fs::write(path, self.contents())?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        info!(path = %path.display(), lines = self.lines.len(), "saved file");
        Ok(())
    }

    /// Save to the remembered path. Returns `Ok(false)` without writing
    /// anything if the document has no path yet.
    ///
    /// # Errors
    ///
    /// The I/O error from writing the file, unchanged.
    pub fn write(&mut self) -> io::Result<bool> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        self.save(&path)?;
        Ok(true)
    }

    // -- Internals ----------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.lines.clone(), self.cursor.row(), self.cursor.col())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let max_leaf = self.options.max_leaf;
        self.lines = snapshot
            .lines
            .into_iter()
            .map(|line| {
                if line.max_leaf() == max_leaf {
                    line
                } else {
                    line.with_leaf_threshold(max_leaf)
                }
            })
            .collect();
        if self.lines.is_empty() {
            self.lines.push(Rope::with_max_leaf("", max_leaf));
        }
        self.cursor.set_position(snapshot.row, snapshot.col);
        self.modified = true;
        self.finalize_edit();
    }

    /// Count an effective edit and rebalance when the threshold is reached.
    fn note_edit(&mut self) {
        self.modified = true;
        self.edit_counter += 1;
        if self.edit_counter >= self.options.rebalance_threshold {
            self.rebalance_all();
        }
    }

    /// Clamp the cursor into the text, then scroll it into view.
    fn finalize_edit(&mut self) {
        self.cursor.clamp(self.lines.as_slice());
        self.viewport
            .ensure_visible(self.cursor.row(), self.cursor.col());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
