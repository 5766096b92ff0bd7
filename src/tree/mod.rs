//! Instrumented AVL tree
//!
//! Insert and delete descend once, remembering the path as direction tokens,
//! then walk that path back up and rebalance every ancestor (deepest first).
//! Each rebalancing step re-navigates from the root, so no borrow into the
//! tree outlives a single step and the full tree can be snapshotted between
//! any two structural changes.
//!
//! Rotation choice at a node with balance factor `bf`:
//!   bf >  1, bf(left)  <  0  -> LR (left on left child, then right)
//!   bf >  1, otherwise       -> LL (right)
//!   bf < -1, bf(right) >  0  -> RL (right on right child, then left)
//!   bf < -1, otherwise       -> RR (left)

mod node;
mod rotation;
mod traversal;
mod validate;

pub use node::{balance_factor, height, Node, NodeId};
pub use traversal::{Direction, Inorder, SearchPath};
pub use validate::{check_invariants, InvariantViolation, ShapeStats, TreeShape};

use std::cmp::Ordering;
use std::fmt::Display;

use tracing::{debug, debug_span, trace};

use crate::snapshot::{Marker, Snapshot};
use crate::step::{
    Operation, Outcome, RotationCase, RotationDirection, RotationPhase, Step, StepKind, StepRecorder,
    Trace,
};
use crate::TraceConfig;
use node::{IdAllocator, Link};
use rotation::{rotate_left, rotate_right};
use traversal::{node_at, node_at_mut, slot_at_mut};

/// Self-balancing binary search tree that records every structural change.
///
/// Keys are unique; inserting a present key and deleting an absent key are
/// inert no-ops that still produce a one-step trace.
#[derive(Debug)]
pub struct AvlTree<K> {
    root: Link<K>,
    len: usize,
    ids: IdAllocator,
    config: TraceConfig,
    recorder: StepRecorder<K>,
}

impl<K> AvlTree<K> {
    /// Empty tree with the default trace configuration.
    pub fn new() -> Self {
        Self::with_config(TraceConfig::default())
    }

    /// Empty tree with a custom trace configuration.
    pub fn with_config(config: TraceConfig) -> Self {
        Self {
            root: None,
            len: 0,
            ids: IdAllocator::default(),
            config,
            recorder: StepRecorder::default(),
        }
    }

    /// Active trace configuration.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Root node, if any.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root (0 when empty).
    pub fn height(&self) -> usize {
        height(self.root.as_deref())
    }

    /// Keys in ascending order, borrowed.
    pub fn iter(&self) -> Inorder<'_, K> {
        Inorder::new(self.root.as_deref())
    }

    /// Steps of the most recently completed operation.
    pub fn steps(&self) -> &[Step<K>] {
        self.recorder.last().map(Trace::steps).unwrap_or(&[])
    }

    /// Trace of the most recently completed operation.
    pub fn last_trace(&self) -> Option<&Trace<K>> {
        self.recorder.last()
    }

    /// Drop every node and the step log. Ids are never reused.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.recorder.reset();
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> AvlTree<K> {
    /// Plain lookup: no steps, no mutation.
    pub fn search(&self, value: &K) -> Option<&Node<K>> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Whether `value` is stored.
    pub fn contains(&self, value: &K) -> bool {
        self.search(value).is_some()
    }

    /// Validate order, cached heights, balance, id uniqueness and the node count.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let stats = check_invariants(self.root.as_deref())?;
        if stats.nodes != self.len {
            return Err(InvariantViolation::Count {
                reported: self.len,
                actual: stats.nodes,
            });
        }
        Ok(())
    }

    /// Path to the node holding `value`, or to the empty slot where it belongs.
    fn locate(&self, value: &K) -> (SearchPath, Option<NodeId>) {
        let mut path = SearchPath::new();
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            let direction = match value.cmp(&node.value) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => return (path, Some(node.id)),
            };
            path.push_level(direction);
            cursor = node.child(direction);
        }
        (path, None)
    }
}

impl<K: Clone> AvlTree<K> {
    /// Deep copy of the current tree.
    pub fn snapshot(&self) -> Snapshot<K> {
        Snapshot::capture(self.root.as_deref())
    }

    /// Sorted key sequence.
    pub fn inorder_traversal(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }
}

impl<K: Ord + Clone + Display> AvlTree<K> {
    /// Insert `value` unless present, rebalancing on the way back up.
    pub fn insert(&mut self, value: K) -> Trace<K> {
        let _span = debug_span!("insert", key = %value).entered();
        self.recorder.begin();
        self.record_bookend(StepKind::Initial, format!("Before insert {value}"));

        let (path, existing) = self.locate(&value);
        if let Some(id) = existing {
            let after = self.snapshot().with_marker(id, Marker::Found);
            self.recorder.record(Step::single(
                format!("{value} is already in the tree; nothing inserted"),
                StepKind::Duplicate,
                after,
            ));
            self.record_bookend(StepKind::Final, format!("Unchanged AVL tree after insert {value}"));
            return self.finish(Operation::Insert(value), Outcome::Duplicate);
        }

        let id = self.ids.allocate();
        let placed = match slot_at_mut(&mut self.root, path.as_slice()) {
            Some(slot) => {
                *slot = Some(Box::new(Node::leaf(value.clone(), id)));
                true
            }
            None => false,
        };
        debug_assert!(placed, "insert path must end in an empty slot");
        self.len += 1;

        if self.config.preview_unbalanced {
            let mut preview = self.snapshot().with_marker(id, Marker::Inserted);
            preview.refresh_heights();
            self.recorder.record(Step::single(
                format!("Unbalanced BST after inserting {value}"),
                StepKind::Preview,
                preview,
            ));
        }

        self.rebalance_path(path.as_slice());

        if !self.recorder.pending().iter().any(|step| step.kind().is_rotation()) {
            let after = self.snapshot().with_marker(id, Marker::Inserted);
            self.recorder.record(Step::single(
                format!("Inserted {value}; no rotation needed"),
                StepKind::Placed,
                after,
            ));
        }
        self.record_bookend(StepKind::Final, format!("Balanced AVL tree after insert {value}"));
        self.finish(Operation::Insert(value), Outcome::Inserted)
    }

    /// Remove `value` if present, rebalancing on the way back up.
    ///
    /// A node with two children takes its in-order successor's key and keeps
    /// its own id; the successor's original node is the one spliced out.
    pub fn delete(&mut self, value: &K) -> Trace<K> {
        let _span = debug_span!("delete", key = %value).entered();
        self.recorder.begin();
        self.record_bookend(StepKind::Initial, format!("Before delete {value}"));

        let (path, found) = self.locate(value);
        let Some(target_id) = found else {
            let after = self.snapshot();
            self.recorder.record(Step::single(
                format!("{value} not found; nothing deleted"),
                StepKind::DeleteMissing,
                after,
            ));
            self.record_bookend(StepKind::Final, format!("After delete {value}"));
            return self.finish(Operation::Delete(value.clone()), Outcome::Absent);
        };

        let marked = self.snapshot().with_marker(target_id, Marker::Deleting);
        self.recorder.record(Step::single(
            format!("Found {value} to delete"),
            StepKind::DeleteFound,
            marked,
        ));

        let two_children = node_at(self.root.as_deref(), path.as_slice())
            .is_some_and(|node| node.left.is_some() && node.right.is_some());
        let splice_path = if two_children {
            self.promote_successor(&path, target_id, value)
        } else {
            path
        };

        let before = self.snapshot();
        if let Some(removed) = self.splice_out(splice_path.as_slice()) {
            self.len -= 1;
            let label = if two_children {
                format!("Removed the original node of successor {}", removed.value)
            } else {
                format!("Removed {value}")
            };
            self.refresh_ancestor_heights(splice_path.as_slice());
            let mut after = self.snapshot();
            if two_children {
                after.mark(target_id, Marker::Successor);
            }
            self.recorder
                .record(Step::transition(label, StepKind::DeleteExcised, before, after));
        }

        self.rebalance_path(splice_path.as_slice());
        self.record_bookend(StepKind::Final, format!("Balanced AVL tree after delete {value}"));
        self.finish(Operation::Delete(value.clone()), Outcome::Deleted)
    }

    /// Lookup that records one step per comparison plus a found/not-found step.
    ///
    /// The tree itself is not modified; only the step log is replaced.
    pub fn search_with_trace(&mut self, value: &K) -> Trace<K> {
        let _span = debug_span!("search", key = %value).entered();
        self.recorder.begin();
        self.record_bookend(StepKind::Initial, format!("Before search {value}"));

        let mut visits = Vec::new();
        let mut found = None;
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            let towards = match value.cmp(&node.value) {
                Ordering::Less => Some(Direction::Left),
                Ordering::Greater => Some(Direction::Right),
                Ordering::Equal => None,
            };
            visits.push((node.id, node.value.clone(), towards));
            match towards {
                Some(direction) => cursor = node.child(direction),
                None => {
                    found = Some(node.id);
                    break;
                }
            }
        }

        let base = self.snapshot();
        for (id, visited, towards) in visits {
            let label = match towards {
                Some(direction) => format!("Compare {value} with {visited}: go {direction}"),
                None => format!("Compare {value} with {visited}: match"),
            };
            self.recorder.record(Step::single(
                label,
                StepKind::SearchCompare { towards },
                base.clone().with_marker(id, Marker::Current),
            ));
        }

        let outcome = match found {
            Some(id) => {
                self.recorder.record(Step::single(
                    format!("Found {value}"),
                    StepKind::SearchFound,
                    base.with_marker(id, Marker::Found),
                ));
                Outcome::Found
            }
            None => {
                self.recorder.record(Step::single(
                    format!("{value} not found"),
                    StepKind::SearchNotFound,
                    base,
                ));
                Outcome::NotFound
            }
        };
        self.record_bookend(StepKind::Final, format!("After search {value}"));
        self.finish(Operation::Search(value.clone()), outcome)
    }

    /// Copy the in-order successor's key into the two-child target at `target`.
    ///
    /// Returns the path of the successor's original node, which is the node
    /// to splice out next.
    fn promote_successor(&mut self, target: &SearchPath, target_id: NodeId, value: &K) -> SearchPath {
        let successor_path = self.min_value_path(target.extended(Direction::Right));
        let Some((successor_id, successor)) = node_at(self.root.as_deref(), successor_path.as_slice())
            .map(|node| (node.id, node.value.clone()))
        else {
            return target.clone();
        };

        let marked = self
            .snapshot()
            .with_marker(target_id, Marker::Deleting)
            .with_marker(successor_id, Marker::Successor);
        self.recorder.record(Step::single(
            format!("{value} has two children; replace it with in-order successor {successor}"),
            StepKind::DeleteSuccessor,
            marked,
        ));

        if let Some(node) = node_at_mut(&mut self.root, target.as_slice()) {
            node.value = successor.clone();
        }

        let marked = self
            .snapshot()
            .with_marker(target_id, Marker::Successor)
            .with_marker(successor_id, Marker::Deleting);
        self.recorder.record(Step::single(
            format!("Copied {successor} into the node of {value}; delete the original {successor}"),
            StepKind::DeleteFound,
            marked,
        ));
        successor_path
    }

    /// Rebalance every ancestor of the slot at `path`, deepest first.
    fn rebalance_path(&mut self, path: &[Direction]) {
        for depth in (0..path.len()).rev() {
            self.balance_at(&path[..depth]);
        }
    }

    /// Refresh the height of the node at `at` and repair its balance.
    fn balance_at(&mut self, at: &[Direction]) {
        let Some(node) = node_at_mut(&mut self.root, at) else {
            return;
        };
        node.update_height();
        let factor = node.balance_factor();
        let case = if factor > 1 {
            if balance_factor(node.left()) < 0 {
                RotationCase::LR
            } else {
                RotationCase::LL
            }
        } else if factor < -1 {
            if balance_factor(node.right()) > 0 {
                RotationCase::RL
            } else {
                RotationCase::RR
            }
        } else {
            return;
        };
        let anchor = node.value.clone();
        trace!(%case, factor, node = %anchor, "imbalance");

        match case {
            RotationCase::LL => self.rotate_at(at, RotationDirection::Right, case, &anchor),
            RotationCase::RR => self.rotate_at(at, RotationDirection::Left, case, &anchor),
            RotationCase::LR => {
                let mut child = at.to_vec();
                child.push(Direction::Left);
                self.rotate_at(&child, RotationDirection::Left, case, &anchor);
                self.rotate_at(at, RotationDirection::Right, case, &anchor);
            }
            RotationCase::RL => {
                let mut child = at.to_vec();
                child.push(Direction::Right);
                self.rotate_at(&child, RotationDirection::Right, case, &anchor);
                self.rotate_at(at, RotationDirection::Left, case, &anchor);
            }
        }
    }

    /// One single rotation at `at`, recorded as an in-progress step and a
    /// complete step.
    fn rotate_at(&mut self, at: &[Direction], direction: RotationDirection, case: RotationCase, anchor: &K) {
        let Some(pivot) = node_at(self.root.as_deref(), at) else {
            return;
        };
        let side = rising_side(direction);
        let Some(rising) = pivot.child(side) else {
            return;
        };
        let transferred = rising.child(side.flip()).map(Node::id);
        let (pivot_id, pivot_value) = (pivot.id, pivot.value.clone());
        let (rising_id, rising_value) = (rising.id, rising.value.clone());

        let before = self.snapshot();
        let mut in_progress = before
            .clone()
            .with_marker(pivot_id, Marker::Pivot)
            .with_marker(rising_id, Marker::Rising);
        if let Some(id) = transferred {
            in_progress.mark(id, Marker::Transferred);
        }
        self.recorder.record(Step::single(
            format!("{case} case at {anchor}: rotate {direction} around {pivot_value}"),
            StepKind::Rotation {
                case,
                direction,
                phase: RotationPhase::InProgress,
            },
            in_progress,
        ));

        if let Some(slot) = slot_at_mut(&mut self.root, at) {
            if let Some(old_root) = slot.take() {
                *slot = Some(match direction {
                    RotationDirection::Right => rotate_right(old_root),
                    RotationDirection::Left => rotate_left(old_root),
                });
            }
        }
        self.refresh_ancestor_heights(at);
        trace!(%case, %direction, pivot = %pivot_value, rising = %rising_value, "rotated");

        let after = self
            .snapshot()
            .with_marker(pivot_id, Marker::Pivot)
            .with_marker(rising_id, Marker::Rising);
        self.recorder.record(Step::transition(
            format!("Rotated {direction} around {pivot_value}; {rising_value} takes its place"),
            StepKind::Rotation {
                case,
                direction,
                phase: RotationPhase::Complete,
            },
            before,
            after,
        ));
    }

    /// Recompute the cached heights above the slot at `path`, deepest first.
    ///
    /// Balance is left alone; this only keeps the next snapshot's heights exact.
    fn refresh_ancestor_heights(&mut self, path: &[Direction]) {
        for depth in (0..path.len()).rev() {
            if let Some(node) = node_at_mut(&mut self.root, &path[..depth]) {
                node.update_height();
            }
        }
    }

    /// Path to the leftmost node below `from` (the `getMinValueNode` walk).
    fn min_value_path(&self, from: SearchPath) -> SearchPath {
        let mut path = from;
        while node_at(self.root.as_deref(), path.as_slice()).is_some_and(|node| node.left.is_some()) {
            path.push_level(Direction::Left);
        }
        path
    }

    /// Detach the node at `at`, promoting its only child.
    ///
    /// Nodes with two children are left in place and `None` is returned.
    fn splice_out(&mut self, at: &[Direction]) -> Option<Box<Node<K>>> {
        let slot = slot_at_mut(&mut self.root, at)?;
        let mut node = slot.take()?;
        let replacement = match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                node.left = Some(left);
                node.right = Some(right);
                *slot = Some(node);
                return None;
            }
            (None, child) | (child, None) => child,
        };
        *slot = replacement;
        Some(node)
    }

    fn record_bookend(&mut self, kind: StepKind, label: String) {
        if self.config.bookend_snapshots {
            let snapshot = self.snapshot();
            self.recorder.record(Step::single(label, kind, snapshot));
        }
    }

    fn finish(&mut self, operation: Operation<K>, outcome: Outcome) -> Trace<K> {
        let trace = self.recorder.finish(operation, outcome);
        debug!(
            operation = %trace.operation(),
            %outcome,
            steps = trace.len(),
            rotations = trace.rotation_count(),
            height = self.height(),
            "operation finished"
        );
        trace
    }
}

/// Child of the pivot that takes its place in a rotation.
fn rising_side(direction: RotationDirection) -> Direction {
    match direction {
        RotationDirection::Right => Direction::Left,
        RotationDirection::Left => Direction::Right,
    }
}

impl<K: Ord + Clone + Display> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord + Clone + Display> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(node: Option<&Node<i32>>) -> String {
        match node {
            None => ".".to_string(),
            Some(n) if n.is_leaf() => n.value.to_string(),
            Some(n) => format!("({} {} {})", shape(n.left()), n.value, shape(n.right())),
        }
    }

    #[test]
    fn test_locate_returns_insertion_slot() {
        let tree: AvlTree<i32> = [20, 10, 30].into_iter().collect();

        let (path, found) = tree.locate(&25);
        assert_eq!(path.as_slice(), &[Direction::Right, Direction::Left]);
        assert!(found.is_none());

        let (path, found) = tree.locate(&10);
        assert_eq!(path.as_slice(), &[Direction::Left]);
        assert_eq!(found, tree.search(&10).map(Node::id));
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let tree: AvlTree<i32> = (1..=7).collect();
        assert_eq!(shape(tree.root()), "((1 2 3) 4 (5 6 7))");
        assert_eq!(tree.height(), 3);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_splice_out_refuses_two_children() {
        let mut tree: AvlTree<i32> = [2, 1, 3].into_iter().collect();
        assert!(tree.splice_out(&[]).is_none());
        assert_eq!(shape(tree.root()), "(1 2 3)");

        let removed = tree.splice_out(&[Direction::Left]).map(|node| node.value);
        assert_eq!(removed, Some(1));
        assert_eq!(shape(tree.root()), "(. 2 3)");
    }

    #[test]
    fn test_min_value_path_walks_left() {
        let tree: AvlTree<i32> = [50, 30, 70, 60, 80].into_iter().collect();
        let path = tree.min_value_path(SearchPath::new().extended(Direction::Right));
        assert_eq!(path.as_slice(), &[Direction::Right, Direction::Left]);
        assert_eq!(node_at(tree.root(), path.as_slice()).map(|n| n.value), Some(60));
    }

    #[test]
    fn test_delete_rebalances_with_zero_balance_child() {
        // Removing 10 leaves 30 with a perfectly balanced right child:
        // a single left rotation, not a double one.
        let mut tree: AvlTree<i32> = [20, 10, 30, 25, 35].into_iter().collect();
        let trace = tree.delete(&10);

        assert_eq!(
            trace.rotations().collect::<Vec<_>>(),
            vec![(RotationCase::RR, RotationDirection::Left)]
        );
        assert_eq!(shape(tree.root()), "((. 20 25) 30 35)");
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_clear_keeps_ids_unique() {
        let mut tree: AvlTree<i32> = [1, 2].into_iter().collect();
        let old = tree.search(&2).map(Node::id);
        tree.clear();
        assert!(tree.steps().is_empty());

        let _ = tree.insert(2);
        assert_ne!(tree.search(&2).map(Node::id), old);
        assert_eq!(tree.len(), 1);
    }
}
