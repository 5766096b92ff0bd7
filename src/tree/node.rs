//! Live tree nodes and the height/balance primitives
//!
//! Each node exclusively owns its children through `Box`; there are no
//! parent pointers. Heights are cached and recomputed bottom-up after every
//! structural change:
//!   height(absent) = 0
//!   height(leaf)   = 1
//!   height(n)      = 1 + max(height(n.left), height(n.right))

use std::fmt;

/// Owned link to an optional child subtree.
pub(crate) type Link<K> = Option<Box<Node<K>>>;

/// Stable node identity, independent of the key it currently holds
///
/// Two-child deletion overwrites a node's key with its successor's key, so
/// renderers correlate nodes across snapshots by id, never by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(transparent))]
pub struct NodeId(u64);

impl NodeId {
    /// Raw numeric id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id counter scoped to one tree instance.
#[derive(Debug, Default, Clone)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Hand out the next unused id.
    pub(crate) fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A key stored in the live tree.
#[derive(Debug)]
pub struct Node<K> {
    pub(crate) value: K,
    pub(crate) id: NodeId,
    pub(crate) height: usize,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
}

impl<K> Node<K> {
    /// Fresh leaf.
    pub(crate) fn leaf(value: K, id: NodeId) -> Self {
        Self {
            value,
            id,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Key held by this node.
    #[inline]
    pub fn value(&self) -> &K {
        &self.value
    }

    /// Stable identity assigned at creation.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Cached height of the subtree rooted here.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Left subtree.
    #[inline]
    pub fn left(&self) -> Option<&Node<K>> {
        self.left.as_deref()
    }

    /// Right subtree.
    #[inline]
    pub fn right(&self) -> Option<&Node<K>> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`, read from cached heights.
    #[inline]
    pub fn balance_factor(&self) -> isize {
        height(self.left.as_deref()) as isize - height(self.right.as_deref()) as isize
    }

    /// Check if leaf
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Recompute the cached height from the children's cached heights.
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
    }
}

/// Height of an optional subtree: 0 when absent, cached value otherwise.
#[inline]
pub fn height<K>(node: Option<&Node<K>>) -> usize {
    node.map_or(0, |n| n.height)
}

/// Balance factor of an optional subtree: 0 when absent.
#[inline]
pub fn balance_factor<K>(node: Option<&Node<K>>) -> isize {
    node.map_or(0, Node::balance_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: i32, id: u64, left: Link<i32>, right: Link<i32>) -> Box<Node<i32>> {
        let mut n = Box::new(Node::leaf(value, NodeId(id)));
        n.left = left;
        n.right = right;
        n.update_height();
        n
    }

    #[test]
    fn test_absent_subtree_primitives() {
        assert_eq!(height::<i32>(None), 0);
        assert_eq!(balance_factor::<i32>(None), 0);
    }

    #[test]
    fn test_height_and_balance_follow_children() {
        let left = node(5, 1, Some(node(2, 2, None, None)), None);
        let root = node(10, 0, Some(left), None);

        assert_eq!(root.height(), 3);
        assert_eq!(root.balance_factor(), 2);
        assert_eq!(root.left().map(Node::balance_factor), Some(1));
        assert!(root.left().and_then(Node::left).is_some_and(Node::is_leaf));
    }

    #[test]
    fn test_ids_are_sequential_per_allocator() {
        let mut first = IdAllocator::default();
        let mut second = IdAllocator::default();

        assert_eq!(first.allocate(), NodeId(0));
        assert_eq!(first.allocate(), NodeId(1));
        assert_eq!(second.allocate(), NodeId(0));
    }
}
