//! Rope tree nodes.
//!
//! A [`RopeNode`] is either a leaf holding a chunk of text or an internal
//! node with exactly two children. Nodes are immutable once built and are
//! always handled through [`Arc`], so any number of ropes (and undo
//! snapshots) can point into the same subtree.
//!
//! # Weight
//!
//! Every node has a *weight* used to route index-based descent:
//!
//! - leaf: its own char count
//! - internal: the char count of its left subtree
//!
//! The weight is computed once in the constructor. Since a node never
//! changes after construction, the invariant cannot drift.
//!
//! # Teardown
//!
//! Between rebalances a tree can be as deep as it has leaves. Dropping one
//! node must not recurse into its children, so [`Drop`] detaches internal
//! children onto a heap stack and frees them one at a time.

use std::mem;
use std::sync::{Arc, LazyLock};

#[derive(Debug)]
pub(crate) enum Kind {
    Leaf {
        text: String,
        chars: usize,
    },
    Internal {
        left: Arc<RopeNode>,
        right: Arc<RopeNode>,
        weight: usize,
        len: usize,
    },
}

/// A node in a rope tree.
#[derive(Debug)]
pub struct RopeNode {
    pub(crate) kind: Kind,
}

impl RopeNode {
    // -- Construction -------------------------------------------------------

    /// A leaf holding `text`.
    #[cfg(test)]
    pub(crate) fn leaf(text: String) -> Arc<Self> {
        let chars = text.chars().count();
        Self::leaf_with_len(text, chars)
    }

    /// A leaf whose char count the caller already knows.
    pub(crate) fn leaf_with_len(text: String, chars: usize) -> Arc<Self> {
        debug_assert_eq!(text.chars().count(), chars);
        Arc::new(Self {
            kind: Kind::Leaf { text, chars },
        })
    }

    /// An empty leaf.
    pub(crate) fn empty() -> Arc<Self> {
        Self::leaf_with_len(String::new(), 0)
    }

    /// An internal node over two existing subtrees. Both are shared, not
    /// copied.
    pub(crate) fn internal(left: Arc<Self>, right: Arc<Self>) -> Arc<Self> {
        let weight = left.len();
        let len = weight + right.len();
        Arc::new(Self {
            kind: Kind::Internal {
                left,
                right,
                weight,
                len,
            },
        })
    }

    /// An internal node with caller-supplied `weight` and `len`, not checked
    /// against the children. Exists to exercise the integrity checks in
    /// [`Rope::try_rebalance`](crate::Rope::try_rebalance).
    #[doc(hidden)]
    #[must_use]
    pub fn internal_unchecked(
        left: Arc<Self>,
        right: Arc<Self>,
        weight: usize,
        len: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind: Kind::Internal {
                left,
                right,
                weight,
                len,
            },
        })
    }

    /// Build a subtree for `text`, halving it at the char midpoint until
    /// every leaf holds at most `max_leaf` chars.
    pub(crate) fn build(text: &str, max_leaf: usize) -> Arc<Self> {
        let chars = text.chars().count();
        Self::build_counted(text, chars, max_leaf)
    }

    fn build_counted(text: &str, chars: usize, max_leaf: usize) -> Arc<Self> {
        if chars <= max_leaf {
            return Self::leaf_with_len(text.to_owned(), chars);
        }
        let mid = chars / 2;
        let at = byte_offset(text, mid);
        let left = Self::build_counted(&text[..at], mid, max_leaf);
        let right = Self::build_counted(&text[at..], chars - mid, max_leaf);
        Self::internal(left, right)
    }

    // -- Accessors ----------------------------------------------------------

    /// Total chars in this subtree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        match &self.kind {
            Kind::Leaf { chars, .. } => *chars,
            Kind::Internal { len, .. } => *len,
        }
    }

    /// True when the subtree holds no text.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Routing weight: leaf length, or the left subtree's length.
    #[inline]
    #[must_use]
    pub const fn weight(&self) -> usize {
        match &self.kind {
            Kind::Leaf { chars, .. } => *chars,
            Kind::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, Kind::Leaf { .. })
    }

    /// The chunk stored in a leaf, or `None` for internal nodes.
    #[must_use]
    pub fn leaf_text(&self) -> Option<&str> {
        match &self.kind {
            Kind::Leaf { text, .. } => Some(text.as_str()),
            Kind::Internal { .. } => None,
        }
    }

    /// The two children of an internal node, or `None` for leaves.
    #[must_use]
    pub const fn children(&self) -> Option<(&Arc<Self>, &Arc<Self>)> {
        match &self.kind {
            Kind::Leaf { .. } => None,
            Kind::Internal { left, right, .. } => Some((left, right)),
        }
    }

    /// Number of levels in the subtree; a lone leaf has depth 1.
    ///
    /// Walks with an explicit stack so degenerate (list-shaped) trees can't
    /// exhaust the call stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1_usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            if let Kind::Internal { left, right, .. } = &node.kind {
                stack.push((left.as_ref(), level + 1));
                stack.push((right.as_ref(), level + 1));
            }
        }
        deepest
    }
}

/// Stand-in child left behind when [`Drop`] detaches a subtree.
static DETACHED: LazyLock<Arc<RopeNode>> = LazyLock::new(|| {
    Arc::new(RopeNode {
        kind: Kind::Leaf {
            text: String::new(),
            chars: 0,
        },
    })
});

impl Drop for RopeNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        detach_internal_children(&mut self.kind, &mut stack);
        while let Some(child) = stack.pop() {
            // Shared subtrees only lose a reference here.
            if let Ok(mut node) = Arc::try_unwrap(child) {
                detach_internal_children(&mut node.kind, &mut stack);
            }
        }
    }
}

/// Move the internal children of `kind` onto `stack`. Leaf children stay;
/// freeing them never recurses.
fn detach_internal_children(kind: &mut Kind, stack: &mut Vec<Arc<RopeNode>>) {
    if let Kind::Internal { left, right, .. } = kind {
        for child in [left, right] {
            if !child.is_leaf() {
                stack.push(mem::replace(child, Arc::clone(&DETACHED)));
            }
        }
    }
}

/// Byte offset of char index `char_idx` in `s`, or `s.len()` when the index
/// is at or past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(byte, _)| byte)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
