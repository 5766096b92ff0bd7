//! Frozen tree copies used as step artifacts
//!
//! A snapshot is a deep, structurally independent copy of the live tree:
//! values, ids and cached heights are copied, and advisory markers can be
//! attached afterwards by id. Later mutation of the live tree never reaches
//! a snapshot that was already taken.

mod markers;

pub use markers::{Marker, Markers};

use std::fmt;

use crate::tree::{check_invariants, InvariantViolation, Node, NodeId, ShapeStats, TreeShape};

/// One node of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct SnapshotNode<K> {
    /// Key at the time of capture.
    pub value: K,
    /// Identity of the live node this was copied from.
    pub id: NodeId,
    /// Cached height at the time of capture.
    pub height: usize,
    /// Advisory markers for the renderer.
    pub markers: Markers,
    /// Left subtree.
    pub left: Option<Box<SnapshotNode<K>>>,
    /// Right subtree.
    pub right: Option<Box<SnapshotNode<K>>>,
}

impl<K: Clone> SnapshotNode<K> {
    /// Deep copy of the live subtree rooted at `node`, without markers.
    pub fn clone_subtree(node: &Node<K>) -> Self {
        Self {
            value: node.value().clone(),
            id: node.id(),
            height: node.height(),
            markers: Markers::empty(),
            left: node.left().map(|child| Box::new(Self::clone_subtree(child))),
            right: node.right().map(|child| Box::new(Self::clone_subtree(child))),
        }
    }
}

impl<K> SnapshotNode<K> {
    fn find(&self, id: NodeId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.left
            .as_deref()
            .and_then(|child| child.find(id))
            .or_else(|| self.right.as_deref().and_then(|child| child.find(id)))
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        if let Some(found) = self.left.as_deref_mut().and_then(|child| child.find_mut(id)) {
            return Some(found);
        }
        self.right.as_deref_mut().and_then(|child| child.find_mut(id))
    }

    fn refresh_heights(&mut self) -> usize {
        let left = self.left.as_deref_mut().map_or(0, Self::refresh_heights);
        let right = self.right.as_deref_mut().map_or(0, Self::refresh_heights);
        self.height = 1 + left.max(right);
        self.height
    }

    fn visit_preorder<'a>(&'a self, out: &mut Vec<&'a SnapshotNode<K>>) {
        out.push(self);
        if let Some(left) = self.left.as_deref() {
            left.visit_preorder(out);
        }
        if let Some(right) = self.right.as_deref() {
            right.visit_preorder(out);
        }
    }
}

impl<K: Ord> TreeShape for SnapshotNode<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.value
    }

    fn node_id(&self) -> NodeId {
        self.id
    }

    fn cached_height(&self) -> usize {
        self.height
    }

    fn left_child(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right_child(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

/// Deep copy of a whole tree at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(transparent))]
pub struct Snapshot<K> {
    root: Option<Box<SnapshotNode<K>>>,
}

impl<K: Clone> Snapshot<K> {
    /// Copy the live tree rooted at `root` (the `cloneTree` operation).
    pub fn capture(root: Option<&Node<K>>) -> Self {
        Self {
            root: root.map(|node| Box::new(SnapshotNode::clone_subtree(node))),
        }
    }

    /// Keys in ascending (in-order) sequence.
    pub fn values(&self) -> Vec<K> {
        let mut out = Vec::new();
        let mut stack: Vec<&SnapshotNode<K>> = Vec::new();
        let mut cursor = self.root.as_deref();
        while cursor.is_some() || !stack.is_empty() {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(node.value.clone());
                cursor = node.right.as_deref();
            }
        }
        out
    }
}

impl<K> Snapshot<K> {
    /// Snapshot of an empty tree.
    pub fn empty() -> Self {
        Self { root: None }
    }

    /// Root node, if any.
    pub fn root(&self) -> Option<&SnapshotNode<K>> {
        self.root.as_deref()
    }

    /// Whether the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.preorder().len()
    }

    /// Cached height of the root (0 when empty).
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |node| node.height)
    }

    /// Locate the copy of the live node with `id` (the `findNodeById` operation).
    pub fn find_by_id(&self, id: NodeId) -> Option<&SnapshotNode<K>> {
        self.root.as_deref()?.find(id)
    }

    /// Mutable variant of [`Snapshot::find_by_id`].
    pub fn find_by_id_mut(&mut self, id: NodeId) -> Option<&mut SnapshotNode<K>> {
        self.root.as_deref_mut()?.find_mut(id)
    }

    /// Attach `marker` to the node with `id`. Returns false when no such node exists.
    pub fn mark(&mut self, id: NodeId, marker: Marker) -> bool {
        match self.find_by_id_mut(id) {
            Some(node) => {
                node.markers.insert(marker);
                true
            }
            None => false,
        }
    }

    /// Builder form of [`Snapshot::mark`]; unknown ids are ignored.
    pub fn with_marker(mut self, id: NodeId, marker: Marker) -> Self {
        self.mark(id, marker);
        self
    }

    /// Ids of the nodes carrying `marker`, in pre-order.
    pub fn marked(&self, marker: Marker) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|node| node.markers.contains(marker))
            .map(|node| node.id)
            .collect()
    }

    /// Drop every marker.
    pub fn clear_markers(&mut self) {
        fn clear<K>(node: &mut SnapshotNode<K>) {
            node.markers = Markers::empty();
            if let Some(left) = node.left.as_deref_mut() {
                clear(left);
            }
            if let Some(right) = node.right.as_deref_mut() {
                clear(right);
            }
        }
        if let Some(root) = self.root.as_deref_mut() {
            clear(root);
        }
    }

    /// Recompute every cached height from the copy's own structure.
    ///
    /// Used for previews taken before the live tree refreshed its heights.
    pub fn refresh_heights(&mut self) {
        if let Some(root) = self.root.as_deref_mut() {
            root.refresh_heights();
        }
    }

    /// Nodes in pre-order.
    pub fn preorder(&self) -> Vec<&SnapshotNode<K>> {
        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            root.visit_preorder(&mut out);
        }
        out
    }
}

impl<K: Ord> Snapshot<K> {
    /// Validate search order, heights and balance of the copy.
    pub fn check_invariants(&self) -> Result<ShapeStats, InvariantViolation> {
        check_invariants(self.root.as_deref())
    }
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Indented outline, one node per line:
///
/// ```text
/// 20 #2 h2 [rising]
///   L 10 #1 h1
///   R 30 #0 h1 [pivot]
/// ```
///
/// A node with a single child prints the absent side as `-`.
impl<K: fmt::Display> fmt::Display for Snapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root.as_deref() {
            None => writeln!(f, "(empty)"),
            Some(root) => write_outline(f, root, 0, ""),
        }
    }
}

fn write_outline<K: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    node: &SnapshotNode<K>,
    depth: usize,
    side: &str,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    write!(f, "{indent}{side}{} #{} h{}", node.value, node.id, node.height)?;
    if !node.markers.is_empty() {
        write!(f, " [{}]", node.markers)?;
    }
    writeln!(f)?;

    if node.left.is_none() && node.right.is_none() {
        return Ok(());
    }
    for (child, side) in [(node.left.as_deref(), "L "), (node.right.as_deref(), "R ")] {
        match child {
            Some(child) => write_outline(f, child, depth + 1, side)?,
            None => writeln!(f, "{}{side}-", "  ".repeat(depth + 1))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::AvlTree;

    fn tree_of(values: &[i32]) -> AvlTree<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_capture_is_isolated_from_live_tree() {
        let mut tree = tree_of(&[2, 1, 3]);
        let before = tree.snapshot();

        let _ = tree.insert(4);
        let _ = tree.delete(&1);

        assert_eq!(before.values(), vec![1, 2, 3]);
        assert_eq!(tree.snapshot().values(), vec![2, 3, 4]);
        assert!(before.check_invariants().is_ok());
    }

    #[test]
    fn test_find_and_mark_by_id() {
        let tree = tree_of(&[20, 10, 30]);
        let left_id = tree
            .root()
            .and_then(|root| root.left())
            .map(|node| node.id())
            .expect("tree should have a left child");

        let mut snap = tree.snapshot();
        assert_eq!(snap.find_by_id(left_id).map(|n| n.value), Some(10));
        assert!(snap.mark(left_id, Marker::Current));
        assert_eq!(snap.marked(Marker::Current), vec![left_id]);

        snap.clear_markers();
        assert!(snap.marked(Marker::Current).is_empty());
    }

    #[test]
    fn test_outline_rendering() {
        let tree = tree_of(&[20, 10]);
        let root_id = tree.root().map(|root| root.id()).expect("non-empty tree");
        let snap = tree.snapshot().with_marker(root_id, Marker::Found);

        assert_eq!(snap.to_string(), "20 #0 h2 [found]\n  L 10 #1 h1\n  R -\n");
        assert_eq!(Snapshot::<i32>::empty().to_string(), "(empty)\n");
    }

    #[test]
    fn test_refresh_heights_repairs_copy() {
        let tree = tree_of(&[5, 3, 8]);
        let mut snap = tree.snapshot();
        let root_id = tree.root().map(|root| root.id()).expect("non-empty tree");
        if let Some(root) = snap.find_by_id_mut(root_id) {
            root.height = 9;
        }
        assert!(snap.check_invariants().is_err());

        snap.refresh_heights();
        assert_eq!(snap.height(), 2);
        assert_eq!(snap.len(), 3);
        assert!(snap.check_invariants().is_ok());
    }
}
