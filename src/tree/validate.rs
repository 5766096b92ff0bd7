//! Structural invariant checks
//!
//! Shared by the live tree and by snapshots: anything exposing keys, ids,
//! cached heights and two children can be validated.

use thiserror::Error;

use super::node::{Node, NodeId};

/// Read-only view of a binary tree node.
pub trait TreeShape {
    /// Key type stored in the node.
    type Key: Ord;

    /// Key held by the node.
    fn key(&self) -> &Self::Key;

    /// Stable node identity.
    fn node_id(&self) -> NodeId;

    /// Height the node claims for its subtree.
    fn cached_height(&self) -> usize;

    /// Left child.
    fn left_child(&self) -> Option<&Self>;

    /// Right child.
    fn right_child(&self) -> Option<&Self>;
}

impl<K: Ord> TreeShape for Node<K> {
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

/// A broken AVL invariant, reported at the first offending node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Key is not strictly between the bounds inherited from its ancestors.
    #[error("node {id} breaks search order (keys must be unique and strictly ordered)")]
    Order {
        /// Offending node.
        id: NodeId,
    },

    /// Cached height disagrees with the children.
    #[error("node {id} caches height {cached}, actual height is {actual}")]
    Height {
        /// Offending node.
        id: NodeId,
        /// Height stored on the node.
        cached: usize,
        /// Height recomputed from the children.
        actual: usize,
    },

    /// Subtree heights differ by more than one.
    #[error("node {id} has balance factor {factor}")]
    Balance {
        /// Offending node.
        id: NodeId,
        /// `height(left) - height(right)`.
        factor: isize,
    },

    /// The same id appears twice.
    #[error("node id {id} appears more than once")]
    DuplicateId {
        /// Repeated id.
        id: NodeId,
    },

    /// Node count bookkeeping is off.
    #[error("tree reports {reported} nodes but holds {actual}")]
    Count {
        /// Count tracked by the tree.
        reported: usize,
        /// Nodes actually reachable from the root.
        actual: usize,
    },
}

/// Summary of a validated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Height of the root (0 for an empty tree).
    pub height: usize,
}

/// Check search order, cached heights, balance and id uniqueness.
pub fn check_invariants<N: TreeShape>(root: Option<&N>) -> Result<ShapeStats, InvariantViolation> {
    let mut seen = Vec::new();
    let (height, nodes) = check_subtree(root, None, None, &mut seen)?;
    seen.sort_unstable();
    if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(InvariantViolation::DuplicateId { id: pair[0] });
    }
    Ok(ShapeStats { nodes, height })
}

fn check_subtree<N: TreeShape>(
    node: Option<&N>,
    lower: Option<&N::Key>,
    upper: Option<&N::Key>,
    seen: &mut Vec<NodeId>,
) -> Result<(usize, usize), InvariantViolation> {
    let Some(node) = node else {
        return Ok((0, 0));
    };
    let id = node.node_id();
    let key = node.key();
    if lower.is_some_and(|low| key <= low) || upper.is_some_and(|high| key >= high) {
        return Err(InvariantViolation::Order { id });
    }
    seen.push(id);

    let (left_height, left_count) = check_subtree(node.left_child(), lower, Some(key), seen)?;
    let (right_height, right_count) = check_subtree(node.right_child(), Some(key), upper, seen)?;

    let actual = 1 + left_height.max(right_height);
    if node.cached_height() != actual {
        return Err(InvariantViolation::Height {
            id,
            cached: node.cached_height(),
            actual,
        });
    }
    let factor = left_height as isize - right_height as isize;
    if factor.abs() > 1 {
        return Err(InvariantViolation::Balance { id, factor });
    }
    Ok((actual, 1 + left_count + right_count))
}
