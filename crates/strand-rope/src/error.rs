//! Errors reported by rope integrity checks.
//!
//! Ordinary editing never fails: out-of-range indices are clamped. These
//! errors only come out of [`Rope::try_rebalance`](crate::Rope::try_rebalance),
//! which verifies the tree it is about to replace and the tree it built.

use thiserror::Error;

/// A structural problem found while rebuilding a rope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RopeError {
    /// An internal node's stored weight disagrees with the length of its
    /// left subtree.
    #[error("internal node weight {found} does not match left subtree length {expected}")]
    WeightMismatch { expected: usize, found: usize },

    /// The rebuilt tree holds a different number of chars than the source.
    #[error("rebalanced rope has {found} chars, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}
