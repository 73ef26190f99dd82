//! Actions and the dispatcher that records undo steps for them.
//!
//! [`Document::save_state`] has to run *before* every mutating operation.
//! The [`Dispatcher`] makes that automatic: input code turns keys into
//! [`Action`]s and hands them over, and the dispatcher decides when a new
//! undo step starts.
//!
//! # Undo steps
//!
//! | Action            | Step handling                                    |
//! |-------------------|--------------------------------------------------|
//! | `InsertChar`      | joins the open step, or opens one                |
//! | `SplitLine`       | always opens a new step, left open for typing    |
//! | `Backspace`       | always its own step                              |
//! | moves, undo, redo | close the open step                              |
//!
//! Typing `ab`, Enter, `c` therefore yields two undo steps: one back to
//! `ab`, one back to the empty line.

use tracing::debug;

use crate::document::Document;

/// One editing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    Backspace,
    SplitLine,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Undo,
    Redo,
}

impl Action {
    /// True for actions that change the text.
    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::InsertChar(_) | Self::Backspace | Self::SplitLine)
    }
}

/// Applies actions to a document, calling `save_state` where a new undo
/// step begins.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    /// An undo step is open and further typing joins it.
    typing: bool,
}

impl Dispatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self { typing: false }
    }

    /// True while consecutive typing is being folded into one step.
    #[inline]
    #[must_use]
    pub const fn step_open(&self) -> bool {
        self.typing
    }

    /// End the open step, so the next insert starts a new one.
    pub const fn close_step(&mut self) {
        self.typing = false;
    }

    /// Apply `action` to `doc`. Returns `false` when it had no effect:
    /// backspace at the start of the document, a move that went nowhere,
    /// or undo/redo with an empty stack.
    pub fn dispatch(&mut self, doc: &mut Document, action: Action) -> bool {
        debug!(?action, typing = self.typing, "dispatch");
        match action {
            Action::InsertChar('\n') | Action::SplitLine => {
                doc.save_state();
                doc.split_line_at_cursor();
                self.typing = true;
                true
            }
            Action::InsertChar(ch) => {
                if !self.typing {
                    doc.save_state();
                }
                doc.insert_char(ch);
                self.typing = true;
                true
            }
            Action::Backspace => {
                self.typing = false;
                let cursor = doc.cursor();
                if cursor.row() == 0 && cursor.col() == 0 {
                    return false;
                }
                doc.save_state();
                doc.backspace_at_cursor();
                true
            }
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown => {
                self.typing = false;
                let before = *doc.cursor();
                match action {
                    Action::MoveLeft => doc.move_left(),
                    Action::MoveRight => doc.move_right(),
                    Action::MoveUp => doc.move_up(),
                    _ => doc.move_down(),
                }
                let after = doc.cursor();
                (before.row(), before.col()) != (after.row(), after.col())
            }
            Action::Undo => {
                self.typing = false;
                doc.undo()
            }
            Action::Redo => {
                self.typing = false;
                doc.redo()
            }
        }
    }

    /// Dispatch `InsertChar` for every char of `text`.
    pub fn type_text(&mut self, doc: &mut Document, text: &str) {
        for ch in text.chars() {
            self.dispatch(doc, Action::InsertChar(ch));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(doc: &Document) -> (usize, usize) {
        (doc.cursor().row(), doc.cursor().col())
    }

    #[test]
    fn typing_enter_typing_is_two_steps() {
        let mut doc = Document::new();
        let mut d = Dispatcher::new();
        d.type_text(&mut doc, "ab");
        d.dispatch(&mut doc, Action::SplitLine);
        d.dispatch(&mut doc, Action::InsertChar('c'));
        assert_eq!(doc.text_lines(), vec!["ab", "c"]);
        assert_eq!(doc.undo_depth(), 2);

        assert!(d.dispatch(&mut doc, Action::Undo));
        assert_eq!(doc.text_lines(), vec!["ab"]);
        assert_eq!(pos(&doc), (0, 2));

        assert!(d.dispatch(&mut doc, Action::Undo));
        assert_eq!(doc.text_lines(), vec![""]);
        assert_eq!(pos(&doc), (0, 0));

        assert!(!d.dispatch(&mut doc, Action::Undo));
    }

    #[test]
    fn newline_char_acts_like_split() {
        let mut doc = Document::new();
        let mut d = Dispatcher::new();
        d.type_text(&mut doc, "ab\nc");
        assert_eq!(doc.text_lines(), vec!["ab", "c"]);
        assert_eq!(doc.undo_depth(), 2);
    }

    #[test]
    fn movement_closes_step() {
        let mut doc = Document::new();
        let mut d = Dispatcher::new();
        d.type_text(&mut doc, "ab");
        assert!(d.step_open());
        d.dispatch(&mut doc, Action::MoveLeft);
        assert!(!d.step_open());
        d.type_text(&mut doc, "x");
        assert_eq!(doc.text_lines(), vec!["axb"]);
        assert_eq!(doc.undo_depth(), 2);
        d.dispatch(&mut doc, Action::Undo);
        assert_eq!(doc.text_lines(), vec!["ab"]);
        assert_eq!(pos(&doc), (0, 1));
    }

    #[test]
    fn each_backspace_is_a_step() {
        let mut doc = Document::from_text("abc");
        doc.set_cursor(0, 3);
        let mut d = Dispatcher::new();
        d.dispatch(&mut doc, Action::Backspace);
        d.dispatch(&mut doc, Action::Backspace);
        assert_eq!(doc.text_lines(), vec!["a"]);
        d.dispatch(&mut doc, Action::Undo);
        assert_eq!(doc.text_lines(), vec!["ab"]);
    }

    #[test]
    fn typing_after_backspace_opens_new_step() {
        let mut doc = Document::from_text("ab");
        doc.set_cursor(0, 2);
        let mut d = Dispatcher::new();
        d.dispatch(&mut doc, Action::Backspace);
        d.type_text(&mut doc, "xy");
        assert_eq!(doc.undo_depth(), 2);
        d.dispatch(&mut doc, Action::Undo);
        assert_eq!(doc.text_lines(), vec!["a"]);
    }

    #[test]
    fn backspace_at_origin_records_nothing() {
        let mut doc = Document::from_text("abc");
        let mut d = Dispatcher::new();
        assert!(!d.dispatch(&mut doc, Action::Backspace));
        assert!(!doc.can_undo());
    }

    #[test]
    fn backspace_merge_scenario() {
        let mut doc = Document::from_text("foo\nhello");
        doc.set_cursor(1, 0);
        let mut d = Dispatcher::new();
        assert!(d.dispatch(&mut doc, Action::Backspace));
        assert_eq!(doc.text_lines(), vec!["foohello"]);
        assert_eq!(pos(&doc), (0, 3));
        d.dispatch(&mut doc, Action::Undo);
        assert_eq!(doc.text_lines(), vec!["foo", "hello"]);
        assert_eq!(pos(&doc), (1, 0));
    }

    #[test]
    fn undo_then_type_clears_redo() {
        let mut doc = Document::new();
        let mut d = Dispatcher::new();
        d.type_text(&mut doc, "a");
        d.dispatch(&mut doc, Action::Undo);
        assert!(doc.can_redo());
        d.type_text(&mut doc, "b");
        assert!(!doc.can_redo());
        assert!(!d.dispatch(&mut doc, Action::Redo));
    }

    #[test]
    fn redo_closes_step() {
        let mut doc = Document::new();
        let mut d = Dispatcher::new();
        d.type_text(&mut doc, "a");
        d.dispatch(&mut doc, Action::Undo);
        assert!(d.dispatch(&mut doc, Action::Redo));
        d.type_text(&mut doc, "b");
        assert_eq!(doc.text_lines(), vec!["ab"]);
        assert_eq!(doc.undo_depth(), 2);
    }

    #[test]
    fn blocked_move_reports_no_effect() {
        let mut doc = Document::from_text("ab");
        let mut d = Dispatcher::new();
        assert!(!d.dispatch(&mut doc, Action::MoveUp));
        assert!(!d.dispatch(&mut doc, Action::MoveLeft));
        assert!(d.dispatch(&mut doc, Action::MoveRight));
    }

    #[test]
    fn is_edit() {
        assert!(Action::InsertChar('x').is_edit());
        assert!(Action::Backspace.is_edit());
        assert!(Action::SplitLine.is_edit());
        assert!(!Action::MoveDown.is_edit());
        assert!(!Action::Undo.is_edit());
    }
}
