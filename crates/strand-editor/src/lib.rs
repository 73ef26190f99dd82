//! # strand-editor — Editor core for strand
//!
//! This crate turns persistent ropes into an editable document:
//!
//! - **[`document`]** — `Document`: one rope per line, editing, file I/O, undo/redo
//! - **[`cursor`]** — `Cursor` with wrap-around movement and a preferred column
//! - **[`viewport`]** — `Viewport` with margin-based scrolling
//! - **[`history`]** — undo/redo stacks of rope snapshots
//! - **[`options`]** — `Options` and the `:set` parser
//! - **[`action`]** — `Action` and the `Dispatcher` that records undo steps
//! - **[`command`]** — `:w`, `:e`, `:q`, `:set` and friends

pub mod action;
pub mod command;
pub mod cursor;
pub mod document;
pub mod history;
pub mod options;
pub mod viewport;

pub use action::{Action, Dispatcher};
pub use command::{Command, CommandResult, execute, parse_command};
pub use cursor::{Cursor, LineLengths};
pub use document::Document;
pub use history::{History, Snapshot};
pub use options::{OptionError, Options};
pub use viewport::Viewport;
