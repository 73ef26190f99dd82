//! Command-line commands — what follows the `:` prompt.
//!
//! # Supported commands
//!
//! | Command        | Action                                     |
//! |----------------|--------------------------------------------|
//! | `:w`           | Save to the document's path                |
//! | `:w <path>`    | Save to a specific path (save-as)          |
//! | `:e <path>`    | Load a file (fails if the document is modified) |
//! | `:e! <path>`   | Load a file, discarding changes            |
//! | `:q`           | Quit (fails if the document is modified)   |
//! | `:q!`          | Force quit (discard changes)               |
//! | `:wq`          | Save and quit                              |
//! | `:set <args>`  | Query or assign options (see [`options`](crate::options)) |
//!
//! Parsing never fails: anything unrecognized becomes
//! [`Command::Unknown`] carrying the input for the error message.

use std::path::PathBuf;

use tracing::info;

use crate::document::Document;
use crate::options::parse_set;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed command-line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:w` — save to the current path.
    Write,

    /// `:w <path>` — save to a specific path.
    WriteAs(PathBuf),

    /// `:e <path>` / `:e! <path>` — replace the document with a file.
    Edit { path: PathBuf, force: bool },

    /// `:q` — quit (refuses if the document is modified).
    Quit,

    /// `:q!` — quit, discarding unsaved changes.
    ForceQuit,

    /// `:wq` — save and quit.
    WriteQuit,

    /// `:set <args>` — the raw argument string.
    Set(String),

    /// Unknown command — contains the full input for error reporting.
    Unknown(String),
}

/// The result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command succeeded. Optional message for the status line.
    Ok(Option<String>),

    /// Command failed. Error message for the status line.
    Err(String),

    /// The caller should stop.
    Quit,
}

const NOT_SAVED: &str = "No write since last change (add ! to override)";
const NO_FILE_NAME: &str = "No file name";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a command string (with or without the leading `:`).
#[must_use]
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start();
    if body.is_empty() {
        return Command::Unknown(String::new());
    }

    let (cmd, arg) = body
        .find(char::is_whitespace)
        .map_or((body, ""), |pos| (&body[..pos], body[pos..].trim()));

    match cmd {
        "w" | "write" => {
            if arg.is_empty() {
                Command::Write
            } else {
                Command::WriteAs(PathBuf::from(arg))
            }
        }
        "e" | "edit" | "e!" | "edit!" if !arg.is_empty() => Command::Edit {
            path: PathBuf::from(arg),
            force: cmd.ends_with('!'),
        },
        "q" | "quit" if arg.is_empty() => Command::Quit,
        "q!" | "quit!" if arg.is_empty() => Command::ForceQuit,
        "wq" if arg.is_empty() => Command::WriteQuit,
        "set" | "se" => Command::Set(arg.to_string()),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run `command` against `doc`.
pub fn execute(doc: &mut Document, command: &Command) -> CommandResult {
    match command {
        Command::Write => match doc.write() {
            Ok(true) => CommandResult::Ok(Some(written_message(doc))),
            Ok(false) => CommandResult::Err(NO_FILE_NAME.to_string()),
            Err(err) => CommandResult::Err(format!("Write failed: {err}")),
        },
        Command::WriteAs(path) => match doc.save(path) {
            Ok(()) => CommandResult::Ok(Some(written_message(doc))),
            Err(err) => CommandResult::Err(format!("Write failed: {err}")),
        },
        Command::Edit { path, force } => {
            if doc.is_modified() && !force {
                return CommandResult::Err(NOT_SAVED.to_string());
            }
            match doc.load(path) {
                Ok(()) => CommandResult::Ok(Some(format!(
                    "\"{}\" {}L",
                    path.display(),
                    doc.line_count()
                ))),
                Err(err) => CommandResult::Err(format!("Can't open \"{}\": {err}", path.display())),
            }
        }
        Command::Quit => {
            if doc.is_modified() {
                CommandResult::Err(NOT_SAVED.to_string())
            } else {
                CommandResult::Quit
            }
        }
        Command::ForceQuit => CommandResult::Quit,
        Command::WriteQuit => match doc.write() {
            Ok(true) => CommandResult::Quit,
            Ok(false) => CommandResult::Err(NO_FILE_NAME.to_string()),
            Err(err) => CommandResult::Err(format!("Write failed: {err}")),
        },
        Command::Set(args) => execute_set(doc, args),
        Command::Unknown(input) if input.is_empty() => CommandResult::Ok(None),
        Command::Unknown(input) => CommandResult::Err(format!("Not an editor command: {input}")),
    }
}

/// Apply every `:set` directive to a copy of the options, then install the
/// copy. The first failing directive aborts the whole command.
fn execute_set(doc: &mut Document, args: &str) -> CommandResult {
    let mut options = *doc.options();
    let mut shown = Vec::new();
    for directive in parse_set(args) {
        match options.apply(&directive) {
            Ok(Some(text)) if !text.is_empty() => shown.push(text),
            Ok(_) => {}
            Err(err) => return CommandResult::Err(err.to_string()),
        }
    }
    if options != *doc.options() {
        info!(?options, "options changed");
        doc.set_options(options);
    }
    if shown.is_empty() {
        CommandResult::Ok(None)
    } else {
        CommandResult::Ok(Some(shown.join(" ")))
    }
}

fn written_message(doc: &Document) -> String {
    let path = doc
        .path()
        .map_or_else(String::new, |p| p.display().to_string());
    format!("\"{path}\" {}L written", doc.line_count())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
