//! Script sessions — drive a document from line-oriented input.
//!
//! Each non-blank line is one step:
//!
//!   type <text>          InsertChar for every char of <text>
//!   enter | backspace    SplitLine / Backspace
//!   left | right | up | down
//!   undo | redo
//!   resize <rows> <cols> resize the viewport
//!   show                 print the visible window and status line
//!   :<command>           run a `:` command (`:w`, `:set so=2`, `:q`, ...)
//!
//! Lines starting with `#` are comments. A failed `:` command prints an
//! error and the session continues; a malformed line stops it.

use std::io::{self, BufRead, Write};

use strand_editor::{Action, Command, CommandResult, Dispatcher, Document, execute, parse_command};
use thiserror::Error;
use tracing::debug;

/// Why a script stopped early.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Type(String),
    Act(Action),
    Resize(usize, usize),
    Show,
    Run(Command),
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_step(line: &str) -> Result<Option<Step>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    if trimmed.starts_with(':') {
        return Ok(Some(Step::Run(parse_command(trimmed))));
    }
    if let Some(text) = line.trim_start().strip_prefix("type ") {
        return Ok(Some(Step::Type(text.to_string())));
    }

    let mut words = trimmed.split_whitespace();
    let word = words.next().unwrap_or_default();
    let step = match word {
        "enter" => Step::Act(Action::SplitLine),
        "backspace" => Step::Act(Action::Backspace),
        "left" => Step::Act(Action::MoveLeft),
        "right" => Step::Act(Action::MoveRight),
        "up" => Step::Act(Action::MoveUp),
        "down" => Step::Act(Action::MoveDown),
        "undo" => Step::Act(Action::Undo),
        "redo" => Step::Act(Action::Redo),
        "show" => Step::Show,
        "resize" => {
            let mut dim = || -> Result<usize, String> {
                let raw = words.next().ok_or("resize needs <rows> <cols>")?;
                raw.parse().map_err(|_| format!("invalid size: {raw}"))
            };
            let rows = dim()?;
            let cols = dim()?;
            Step::Resize(rows, cols)
        }
        _ => return Err(format!("unknown step: {trimmed}")),
    };
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    Ok(Some(step))
}

/// A document plus the dispatcher that records its undo steps.
#[derive(Debug)]
pub struct Session {
    doc: Document,
    dispatcher: Dispatcher,
    quit: bool,
}

impl Session {
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            dispatcher: Dispatcher::new(),
            quit: false,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// True once a `:q` family command succeeded.
    #[must_use]
    pub const fn has_quit(&self) -> bool {
        self.quit
    }

    /// Run every line of `input`, then print the final window unless the
    /// script quit.
    ///
    /// # Errors
    ///
    /// A malformed line, or failure to read input or write output.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<(), ScriptError> {
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let step = parse_step(&line).map_err(|message| ScriptError::Parse {
                line: idx + 1,
                message,
            })?;
            if let Some(step) = step {
                self.apply(step, out)?;
            }
            if self.quit {
                return Ok(());
            }
        }
        self.render(out)?;
        Ok(())
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// Failure to write output.
    pub fn apply(&mut self, step: Step, out: &mut impl Write) -> io::Result<()> {
        debug!(?step, "script step");
        match step {
            Step::Type(text) => self.dispatcher.type_text(&mut self.doc, &text),
            Step::Act(action) => {
                self.dispatcher.dispatch(&mut self.doc, action);
            }
            Step::Resize(rows, cols) => self.doc.set_viewport_size(rows, cols),
            Step::Show => self.render(out)?,
            Step::Run(command) => {
                self.dispatcher.close_step();
                match execute(&mut self.doc, &command) {
                    CommandResult::Ok(Some(msg)) => writeln!(out, "{msg}")?,
                    CommandResult::Ok(None) => {}
                    CommandResult::Err(msg) => writeln!(out, "E: {msg}")?,
                    CommandResult::Quit => self.quit = true,
                }
            }
        }
        Ok(())
    }

    /// Print the visible window followed by the status line.
    ///
    /// # Errors
    ///
    /// Failure to write output.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        for line in self.doc.visible_window() {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{}", status_line(&self.doc))
    }
}

/// `name [+] row:col` with a 1-based position, like a modeline.
#[must_use]
pub fn status_line(doc: &Document) -> String {
    let name = doc
        .path()
        .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
    let modified = if doc.is_modified() { " [+]" } else { "" };
    let cursor = doc.cursor();
    format!("{name}{modified} {}:{}", cursor.row() + 1, cursor.col() + 1)
}
