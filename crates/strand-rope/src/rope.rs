//! Persistent rope — the text container behind every line.
//!
//! A [`Rope`] is a handle to the root of an immutable binary tree of text
//! chunks (see [`RopeNode`]). Every editing operation returns a *new* rope
//! and leaves the receiver untouched; only the nodes along the edited path
//! are rebuilt, everything else is shared through [`Arc`].
//!
//! ```text
//!   before insert              after insert at 7
//!
//!        (5)                        (5)'
//!       /   \                      /   \
//!   "hello" (6)        →      "hello"  (6)'      ← new nodes on the path
//!          /   \       shared ─────┘  /   \
//!      " world" "!"              " wXorld" "!"   ← "!" is shared too
//! ```
//!
//! # Design choices
//!
//! - **Indices are char offsets.** Column 3 of `"café"` is `'é'`. Bytes never
//!   appear in the public API.
//!
//! - **Out-of-range indices clamp.** `insert` past the end appends, `delete`
//!   clips its range to the text, `split` past the end returns
//!   `(self, empty)`. No operation panics on an index.
//!
//! - **Small-leaf threshold.** An insert that keeps its leaf within
//!   `max_leaf` chars just replaces that leaf (depth unchanged). A larger one
//!   splits the leaf at its midpoint, growing the tree by one level locally.
//!
//! - **No automatic rebalancing.** `concat` and repeated inserts let the
//!   tree grow deeper; callers run [`rebalance`](Rope::rebalance)
//!   periodically to bring it back to `O(log leaves)` depth.

use std::fmt;
use std::sync::Arc;

use crate::error::RopeError;
use crate::node::{Kind, RopeNode, byte_offset};

/// Default small-leaf threshold, in chars.
pub const DEFAULT_MAX_LEAF: usize = 64;

// ---------------------------------------------------------------------------
// Rope
// ---------------------------------------------------------------------------

/// An immutable, cheaply clonable text tree.
///
/// Cloning bumps one reference count. Two clones share every node until one
/// of them is edited, and even then only the edited path diverges.
#[derive(Clone)]
pub struct Rope {
    root: Arc<RopeNode>,
    max_leaf: usize,
}

impl Rope {
    // -- Construction -------------------------------------------------------

    /// An empty rope with the default leaf threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::from_root(RopeNode::empty(), DEFAULT_MAX_LEAF)
    }

    /// Build a rope for `text` whose leaves hold at most `max_leaf` chars
    /// (minimum 1).
    #[must_use]
    pub fn with_max_leaf(text: &str, max_leaf: usize) -> Self {
        let max_leaf = max_leaf.max(1);
        Self::from_root(RopeNode::build(text, max_leaf), max_leaf)
    }

    /// Wrap an existing tree. The tree is shared, not copied.
    #[must_use]
    pub fn from_root(root: Arc<RopeNode>, max_leaf: usize) -> Self {
        Self {
            root,
            max_leaf: max_leaf.max(1),
        }
    }

    /// The same text under a different leaf threshold. Shares the tree; the
    /// new threshold only affects future inserts.
    #[must_use]
    pub fn with_leaf_threshold(&self, max_leaf: usize) -> Self {
        Self::from_root(Arc::clone(&self.root), max_leaf)
    }

    // -- Accessors ----------------------------------------------------------

    /// The root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> &Arc<RopeNode> {
        &self.root
    }

    /// The small-leaf threshold used by [`insert`](Self::insert).
    #[inline]
    #[must_use]
    pub const fn max_leaf(&self) -> usize {
        self.max_leaf
    }

    /// Total number of chars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Levels in the tree; a single leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of leaves, including empty ones.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// True when both ropes point at the very same root node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Concatenate every leaf into a `String`. O(n).
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for chunk in self.leaves() {
            out.push_str(chunk);
        }
        out
    }

    /// The char at `index`, or `None` past the end.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        let mut node = self.root.as_ref();
        let mut index = index;
        loop {
            match &node.kind {
                Kind::Leaf { text, .. } => return text.chars().nth(index),
                Kind::Internal {
                    left,
                    right,
                    weight,
                    ..
                } => {
                    if index < *weight {
                        node = left.as_ref();
                    } else {
                        index -= weight;
                        node = right.as_ref();
                    }
                }
            }
        }
    }

    /// The chars in `[start, end)`, clamped to the text.
    #[must_use]
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        if start >= end {
            return String::new();
        }
        self.chars().skip(start).take(end - start).collect()
    }

    /// Iterate over the leaf chunks in order.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.root.as_ref()],
        }
    }

    /// Iterate over the chars in order.
    #[must_use]
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            leaves: self.leaves(),
            current: "".chars(),
        }
    }

    // -- Editing ------------------------------------------------------------

    /// Split into `[0, index)` and `[index, len)`.
    ///
    /// Only the leaf containing `index` is cut; the path above it is rebuilt
    /// and every other subtree is shared by the two halves. An index that
    /// falls exactly between two subtrees cuts no leaf at all.
    #[must_use]
    pub fn split(&self, index: usize) -> (Self, Self) {
        if index == 0 {
            return (self.derive(RopeNode::empty()), self.clone());
        }
        if index >= self.len() {
            return (self.clone(), self.derive(RopeNode::empty()));
        }
        let (left, right) = split_node(&self.root, index);
        (self.derive(left), self.derive(right))
    }

    /// A rope with `self` on the left and `other` on the right. O(1); the
    /// result is not rebalanced.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        self.derive(RopeNode::internal(
            Arc::clone(&self.root),
            Arc::clone(&other.root),
        ))
    }

    /// Insert `text` before the char at `index` (clamped to `len`).
    #[must_use]
    pub fn insert(&self, index: usize, text: &str) -> Self {
        if text.is_empty() {
            return self.clone();
        }
        let index = index.min(self.len());
        let text_chars = text.chars().count();
        self.derive(insert_node(
            &self.root,
            index,
            text,
            text_chars,
            self.max_leaf,
        ))
    }

    /// Remove the chars in `[start, end)`. Both bounds clamp to `len`; an
    /// empty or inverted range returns an unchanged clone.
    #[must_use]
    pub fn delete(&self, start: usize, end: usize) -> Self {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        if start == end {
            return self.clone();
        }
        self.derive(delete_node(&self.root, start, end))
    }

    // -- Rebalancing --------------------------------------------------------

    /// Rebuild the tree as a near-complete binary tree over its non-empty
    /// leaves. The text is unchanged.
    ///
    /// Returns an error instead of a rope if the source tree has an
    /// inconsistent weight or the rebuilt tree's length doesn't match.
    ///
    /// # Errors
    ///
    /// [`RopeError::WeightMismatch`] or [`RopeError::LengthMismatch`].
    pub fn try_rebalance(&self) -> Result<Self, RopeError> {
        let leaves = collect_leaves(&self.root)?;
        let root = build_balanced(&leaves);
        let expected = self.len();
        if root.len() != expected {
            return Err(RopeError::LengthMismatch {
                expected,
                found: root.len(),
            });
        }
        Ok(self.derive(root))
    }

    /// Like [`try_rebalance`](Self::try_rebalance), but hands back an
    /// unchanged clone if the tree can't be rebuilt.
    #[must_use]
    pub fn rebalance(&self) -> Self {
        self.try_rebalance().unwrap_or_else(|_| self.clone())
    }

    /// A rope over `root` that inherits this rope's leaf threshold.
    fn derive(&self, root: Arc<RopeNode>) -> Self {
        Self {
            root,
            max_leaf: self.max_leaf,
        }
    }
}

impl Default for Rope {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Self::with_max_leaf(text, DEFAULT_MAX_LEAF)
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.chars().eq(other.chars()))
    }
}

impl Eq for Rope {}

impl fmt::Debug for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rope").field(&self.text()).finish()
    }
}

impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.leaves() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// In-order iterator over leaf chunks. Created by [`Rope::leaves`].
pub struct Leaves<'a> {
    stack: Vec<&'a RopeNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match &node.kind {
                Kind::Leaf { text, .. } => return Some(text.as_str()),
                Kind::Internal { left, right, .. } => {
                    self.stack.push(right.as_ref());
                    self.stack.push(left.as_ref());
                }
            }
        }
        None
    }
}

/// In-order iterator over chars. Created by [`Rope::chars`].
pub struct Chars<'a> {
    leaves: Leaves<'a>,
    current: std::str::Chars<'a>,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.current.next() {
                return Some(ch);
            }
            self.current = self.leaves.next()?.chars();
        }
    }
}

// ---------------------------------------------------------------------------
// Tree operations
// ---------------------------------------------------------------------------

/// One step of a descent: which child was taken, carrying the sibling that
/// was not.
enum Branch<'a> {
    Left(&'a Arc<RopeNode>),
    Right(&'a Arc<RopeNode>),
}

/// Rebuild the path above a replaced subtree, sharing every sibling.
fn rejoin(path: Vec<Branch<'_>>, mut node: Arc<RopeNode>) -> Arc<RopeNode> {
    for branch in path.into_iter().rev() {
        node = match branch {
            Branch::Left(right) => RopeNode::internal(node, Arc::clone(right)),
            Branch::Right(left) => RopeNode::internal(Arc::clone(left), node),
        };
    }
    node
}

/// Split `node` at `index`. Returns shared subtrees wherever possible.
///
/// Walks down with an explicit path so list-shaped trees can't exhaust the
/// call stack.
fn split_node(node: &Arc<RopeNode>, index: usize) -> (Arc<RopeNode>, Arc<RopeNode>) {
    let mut path = Vec::new();
    let mut node = node;
    let mut index = index;
    let (mut left_part, mut right_part) = loop {
        if index == 0 {
            break (RopeNode::empty(), Arc::clone(node));
        }
        if index >= node.len() {
            break (Arc::clone(node), RopeNode::empty());
        }
        match &node.kind {
            Kind::Leaf { text, chars } => {
                let at = byte_offset(text, index);
                break (
                    RopeNode::leaf_with_len(text[..at].to_owned(), index),
                    RopeNode::leaf_with_len(text[at..].to_owned(), chars - index),
                );
            }
            Kind::Internal {
                left,
                right,
                weight,
                ..
            } => {
                if index == *weight {
                    break (Arc::clone(left), Arc::clone(right));
                } else if index < *weight {
                    path.push(Branch::Left(right));
                    node = left;
                } else {
                    path.push(Branch::Right(left));
                    index -= weight;
                    node = right;
                }
            }
        }
    };

    for branch in path.into_iter().rev() {
        match branch {
            Branch::Left(right) => {
                right_part = RopeNode::internal(right_part, Arc::clone(right));
            }
            Branch::Right(left) => {
                left_part = RopeNode::internal(Arc::clone(left), left_part);
            }
        }
    }
    (left_part, right_part)
}

/// Insert `text` (of `text_chars` chars) at `index` below `node`.
fn insert_node(
    node: &Arc<RopeNode>,
    index: usize,
    text: &str,
    text_chars: usize,
    max_leaf: usize,
) -> Arc<RopeNode> {
    let mut path = Vec::new();
    let mut node = node;
    let mut index = index;
    loop {
        match &node.kind {
            Kind::Leaf { text: data, chars } => {
                let at = byte_offset(data, index);
                let mut spliced = String::with_capacity(data.len() + text.len());
                spliced.push_str(&data[..at]);
                spliced.push_str(text);
                spliced.push_str(&data[at..]);
                let total = chars + text_chars;
                let leaf = if total <= max_leaf {
                    RopeNode::leaf_with_len(spliced, total)
                } else {
                    RopeNode::build(&spliced, max_leaf)
                };
                return rejoin(path, leaf);
            }
            Kind::Internal {
                left,
                right,
                weight,
                ..
            } => {
                if index < *weight {
                    path.push(Branch::Left(right));
                    node = left;
                } else {
                    path.push(Branch::Right(left));
                    index -= weight;
                    node = right;
                }
            }
        }
    }
}

/// Pending work for [`delete_node`].
enum DeleteTask<'a> {
    /// Delete `[start, end)` below the node and push the result.
    Visit(&'a Arc<RopeNode>, usize, usize),
    /// Push an untouched subtree.
    Keep(&'a Arc<RopeNode>),
    /// Pop right then left, push their join.
    Join,
}

/// Remove `[start, end)` below `node`. Requires `start < end <= node.len()`.
///
/// A range can straddle many nodes, so this runs as a post-order walk over
/// explicit task and result stacks instead of recursing.
fn delete_node(node: &Arc<RopeNode>, start: usize, end: usize) -> Arc<RopeNode> {
    let mut tasks = vec![DeleteTask::Visit(node, start, end)];
    let mut results: Vec<Arc<RopeNode>> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            DeleteTask::Keep(node) => results.push(Arc::clone(node)),
            DeleteTask::Join => {
                let (Some(right), Some(left)) = (results.pop(), results.pop()) else {
                    break;
                };
                results.push(RopeNode::internal(left, right));
            }
            DeleteTask::Visit(node, start, end) => {
                if start == 0 && end >= node.len() {
                    results.push(RopeNode::empty());
                    continue;
                }
                match &node.kind {
                    Kind::Leaf { text, chars } => {
                        let from = byte_offset(text, start);
                        let to = byte_offset(text, end);
                        let mut kept = String::with_capacity(text.len() - (to - from));
                        kept.push_str(&text[..from]);
                        kept.push_str(&text[to..]);
                        results.push(RopeNode::leaf_with_len(kept, chars - (end - start)));
                    }
                    Kind::Internal {
                        left,
                        right,
                        weight,
                        ..
                    } => {
                        let w = *weight;
                        // Tasks run in reverse push order.
                        tasks.push(DeleteTask::Join);
                        if end <= w {
                            tasks.push(DeleteTask::Keep(right));
                            tasks.push(DeleteTask::Visit(left, start, end));
                        } else if start >= w {
                            tasks.push(DeleteTask::Visit(right, start - w, end - w));
                            tasks.push(DeleteTask::Keep(left));
                        } else {
                            tasks.push(DeleteTask::Visit(right, 0, end - w));
                            tasks.push(DeleteTask::Visit(left, start, w));
                        }
                    }
                }
            }
        }
    }

    results.pop().unwrap_or_else(RopeNode::empty)
}

/// Gather the non-empty leaves in order, checking every internal weight on
/// the way down.
fn collect_leaves(root: &Arc<RopeNode>) -> Result<Vec<Arc<RopeNode>>, RopeError> {
    let mut leaves = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match &node.kind {
            Kind::Leaf { chars, .. } => {
                if *chars > 0 {
                    leaves.push(Arc::clone(node));
                }
            }
            Kind::Internal {
                left,
                right,
                weight,
                ..
            } => {
                if left.len() != *weight {
                    return Err(RopeError::WeightMismatch {
                        expected: left.len(),
                        found: *weight,
                    });
                }
                stack.push(right);
                stack.push(left);
            }
        }
    }
    Ok(leaves)
}

/// Build a near-complete tree over `leaves` by halving the list.
fn build_balanced(leaves: &[Arc<RopeNode>]) -> Arc<RopeNode> {
    match leaves {
        [] => RopeNode::empty(),
        [only] => Arc::clone(only),
        _ => {
            let mid = leaves.len() / 2;
            RopeNode::internal(
                build_balanced(&leaves[..mid]),
                build_balanced(&leaves[mid..]),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
