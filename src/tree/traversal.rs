//! Root-relative paths and in-order traversal
//!
//! Rebalancing walks back up the path an operation took on the way down.
//! Instead of holding borrows into the tree, the path is kept as a stack of
//! direction tokens and every slot is re-navigated from the root on demand.
//! Between two rebalancing steps no borrow into the tree is alive, so the
//! whole tree can be snapshotted at any point of the walk.

use std::fmt;

use super::node::{Link, Node};

/// Which child a path token descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Descend into the left child
    Left,

    /// Descend into the right child
    Right,
}

impl Direction {
    /// Opposite side.
    pub fn flip(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

impl<K> Node<K> {
    pub(crate) fn child(&self, direction: Direction) -> Option<&Node<K>> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    pub(crate) fn child_slot_mut(&mut self, direction: Direction) -> &mut Link<K> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Stack of direction tokens from the root to the current slot
///
/// Depth d of the path addresses the node reached after the first d tokens;
/// depth 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    tokens: Vec<Direction>,
}

impl SearchPath {
    /// Empty path addressing the root slot.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Descend one level.
    pub fn push_level(&mut self, direction: Direction) {
        self.tokens.push(direction);
    }

    /// Ascend one level.
    pub fn pop_level(&mut self) -> Option<Direction> {
        self.tokens.pop()
    }

    /// Number of tokens on the stack.
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens from the root downwards.
    pub fn as_slice(&self) -> &[Direction] {
        &self.tokens
    }

    /// Copy of the path extended by one token.
    pub fn extended(&self, direction: Direction) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(direction);
        Self { tokens }
    }
}

/// Slot reached by following `path` from `root`.
///
/// `None` when the path runs through an absent child.
pub(crate) fn slot_at_mut<'a, K>(root: &'a mut Link<K>, path: &[Direction]) -> Option<&'a mut Link<K>> {
    let mut slot = root;
    for &direction in path {
        slot = slot.as_mut()?.child_slot_mut(direction);
    }
    Some(slot)
}

/// Node reached by following `path` from `root`.
pub(crate) fn node_at<'a, K>(root: Option<&'a Node<K>>, path: &[Direction]) -> Option<&'a Node<K>> {
    let mut node = root?;
    for &direction in path {
        node = node.child(direction)?;
    }
    Some(node)
}

/// Mutable node reached by following `path` from `root`.
pub(crate) fn node_at_mut<'a, K>(root: &'a mut Link<K>, path: &[Direction]) -> Option<&'a mut Node<K>> {
    slot_at_mut(root, path)?.as_deref_mut()
}

/// Borrowing in-order iterator over the keys of a tree.
///
/// Stack depth is bounded by the tree height.
#[derive(Debug)]
pub struct Inorder<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Inorder<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, K> Iterator for Inorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.value())
    }
}
