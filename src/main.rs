// SPDX-License-Identifier: MIT
//
// strand — a rope-backed text editor core driven by scripts.
//
// This is the main binary that wires together the crates:
//
//   strand-rope   → persistent ropes with structural sharing
//   strand-editor → document, cursor, viewport, undo history, commands
//
// There is no terminal UI. Input is a script of editing steps (from a file
// or stdin); output is the visible window plus a status line on stdout.
// Each step flows through:
//
//   script line → parse_step → Dispatcher → Document → Viewport
//   show / end of input → visible_window + status line → stdout
//
// Usage:
//
//   strand [FILE] [--script SCRIPT]

mod logging;
mod script;

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use strand_editor::Document;
use tracing::info;

use crate::script::Session;

const USAGE: &str = "usage: strand [FILE] [--script SCRIPT]";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    file: Option<PathBuf>,
    script: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "-s" | "--script" => {
                    let path = args.next().ok_or("--script needs a path")?;
                    parsed.script = Some(PathBuf::from(path));
                }
                _ if arg.starts_with("--script=") => {
                    parsed.script = Some(PathBuf::from(&arg["--script=".len()..]));
                }
                _ if arg.starts_with('-') => {
                    return Err(format!("unknown option: {arg}"));
                }
                _ if parsed.file.is_none() => parsed.file = Some(PathBuf::from(arg)),
                _ => return Err(format!("unexpected argument: {arg}")),
            }
        }
        Ok(parsed)
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// Load `path`, or start an empty document bound to it if it doesn't exist.
fn open_document(path: Option<PathBuf>) -> io::Result<Document> {
    let Some(path) = path else {
        return Ok(Document::new());
    };
    match Document::from_file(&path) {
        Ok(doc) => Ok(doc),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "new file");
            let mut doc = Document::new();
            doc.set_path(path);
            Ok(doc)
        }
        Err(err) => Err(err),
    }
}

fn main() {
    logging::init();

    let args = Args::parse(env::args().skip(1)).unwrap_or_else(|msg| {
        eprintln!("strand: {msg}");
        eprintln!("{USAGE}");
        process::exit(2);
    });
    if args.help {
        println!("{USAGE}");
        return;
    }

    let label = args
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let doc = open_document(args.file).unwrap_or_else(|e| {
        eprintln!("strand: {label}: {e}");
        process::exit(1);
    });

    let mut session = Session::new(doc);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => session.run(BufReader::new(file), &mut out),
            Err(e) => {
                eprintln!("strand: {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => session.run(io::stdin().lock(), &mut out),
    };

    if let Err(e) = result {
        eprintln!("strand: {e}");
        process::exit(1);
    }
    info!(
        quit = session.has_quit(),
        lines = session.document().line_count(),
        "session finished"
    );
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_args() {
        assert_eq!(parse(&[]), Ok(Args::default()));
    }

    #[test]
    fn file_and_script() {
        let args = parse(&["notes.txt", "--script", "steps.txt"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.script, Some(PathBuf::from("steps.txt")));

        let args = parse(&["--script=steps.txt"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("steps.txt")));
        assert_eq!(args.file, None);
    }

    #[test]
    fn help_flag() {
        assert!(parse(&["-h"]).unwrap().help);
    }

    #[test]
    fn bad_args() {
        assert!(parse(&["--script"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn open_missing_file_binds_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");
        let doc = open_document(Some(path.clone())).unwrap();
        assert_eq!(doc.text_lines(), vec![String::new()]);
        assert_eq!(doc.path(), Some(path.as_path()));
    }

    #[test]
    fn open_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        std::fs::write(&path, "hello\nworld").unwrap();
        let doc = open_document(Some(path)).unwrap();
        assert_eq!(doc.text_lines(), vec!["hello", "world"]);
    }

    #[test]
    fn open_nothing_is_empty() {
        let doc = open_document(None).unwrap();
        assert!(doc.path().is_none());
    }
}
