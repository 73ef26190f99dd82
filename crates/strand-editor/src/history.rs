//! Undo/redo history — snapshots of rope roots.
//!
//! Because ropes are immutable, remembering a document state is just
//! remembering its line handles: a [`Snapshot`] clones one `Arc` per line and
//! copies no text. Restoring is the same operation in reverse.
//!
//! # Usage
//!
//! ```text
//! history.record(current_snapshot);   // before the edit
//! // edit the document
//! history.undo(current_snapshot)      // → Some(snapshot to restore)
//! history.redo(current_snapshot)      // → Some(snapshot to restore)
//! ```
//!
//! Recording clears the redo stack (branching history is not supported —
//! any new edit after an undo discards the forward history). Both stacks are
//! unbounded unless a limit is set, in which case the oldest undo entries are
//! dropped first.

use strand_rope::Rope;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A document state: the line ropes plus the cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub lines: Vec<Rope>,
    pub row: usize,
    pub col: usize,
}

impl Snapshot {
    #[must_use]
    pub const fn new(lines: Vec<Rope>, row: usize, col: usize) -> Self {
        Self { lines, row, col }
    }

    /// True when every line of both snapshots is the very same tree.
    #[must_use]
    pub fn shares_lines_with(&self, other: &Self) -> bool {
        self.lines.len() == other.lines.len()
            && self.lines.iter().zip(&other.lines).all(|(a, b)| a.ptr_eq(b))
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo and redo stacks for one document.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: Option<usize>,
}

impl History {
    /// An empty, unbounded history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: None,
        }
    }

    /// Cap the undo stack at `limit` entries (`None` for no cap). Excess
    /// entries are dropped immediately, oldest first.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Remember the state before an edit and forget the redo stack.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        self.enforce_limit();
    }

    /// Step back. `current` goes onto the redo stack; the returned snapshot
    /// is the state to restore. `None` (and no change) if there is nothing
    /// to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward; the mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        self.enforce_limit();
        Some(next)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            self.undo_stack.drain(..excess);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
