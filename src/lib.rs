//! # Step-recording AVL tree
//!
//! An AVL tree whose insert, delete and search produce a deterministic,
//! ordered trace of "animation steps": deep snapshots of the tree at every
//! meaningful moment (unbalanced intermediate states, both halves of every
//! rotation, delete targets and successors, search comparisons). A renderer
//! replays the trace; the tree never computes layout.
//!
//! ## Core Algorithm
//!
//! 1. **Descend once**: record the root-to-slot path as direction tokens
//! 2. **Mutate**: place the new leaf, or splice out the target (two-child
//!    targets take their in-order successor's key first)
//! 3. **Walk back up**: refresh heights and rotate (LL/RR/LR/RL) deepest first
//! 4. **Record**: snapshot the whole tree around every structural change
//!
//! ## Usage Example
//!
//! ```
//! use stepwise_avl::{AvlTree, RotationCase, RotationDirection};
//!
//! let mut tree = AvlTree::new();
//! let _ = tree.insert(30);
//! let _ = tree.insert(20);
//! let trace = tree.insert(10);
//!
//! assert_eq!(
//!     trace.rotations().collect::<Vec<_>>(),
//!     vec![(RotationCase::LL, RotationDirection::Right)]
//! );
//! assert_eq!(tree.root().map(|root| *root.value()), Some(20));
//! assert_eq!(tree.inorder_traversal(), vec![10, 20, 30]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules
pub mod tree;     // Live AVL tree, rotations, traversal, invariants
pub mod snapshot; // Frozen tree copies and markers
pub mod step;     // Steps, traces and the step recorder
pub mod playback; // Cursor over recorded steps
pub mod input;    // Key and command-script parsing

// Re-exports for convenience
pub use input::{parse_key, parse_script, Command, InputError};
pub use playback::Playback;
pub use snapshot::{Marker, Markers, Snapshot, SnapshotNode};
pub use step::{
    Operation, Outcome, RotationCase, RotationDirection, RotationPhase, Step, StepKind, Trace,
};
pub use tree::{AvlTree, Direction, InvariantViolation, Node, NodeId};

/// What a tree records besides the mandatory steps
///
/// The defaults record exactly the algorithmic steps: rotations, delete
/// targets, search comparisons and the terminal step of every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceConfig {
    /// Record a plain BST snapshot right after a new leaf is placed,
    /// before any rebalancing.
    pub preview_unbalanced: bool,

    /// Record the tree before and after every operation.
    pub bookend_snapshots: bool,
}

impl TraceConfig {
    /// Only the algorithmic steps.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Everything a step-by-step viewer wants: preview plus bookends.
    pub fn presentation() -> Self {
        Self {
            preview_unbalanced: true,
            bookend_snapshots: true,
        }
    }

    /// Toggle the unbalanced preview.
    pub fn with_preview(mut self, enabled: bool) -> Self {
        self.preview_unbalanced = enabled;
        self
    }

    /// Toggle the before/after bookends.
    pub fn with_bookends(mut self, enabled: bool) -> Self {
        self.bookend_snapshots = enabled;
        self
    }
}
