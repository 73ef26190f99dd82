//! # strand-rope — Persistent rope for strand
//!
//! - **[`node`]** — `RopeNode`, the immutable tree node (leaf or internal)
//! - **[`rope`]** — `Rope`, the handle that every edit returns a new copy of
//! - **[`error`]** — `RopeError`, reported by rebalance integrity checks
//!
//! Nodes live behind `Arc`, so ropes are `Send + Sync` and old versions stay
//! valid for as long as anything (an undo snapshot, a renderer) holds them.

pub mod error;
pub mod node;
pub mod rope;

pub use error::RopeError;
pub use node::RopeNode;
pub use rope::{Chars, DEFAULT_MAX_LEAF, Leaves, Rope};
