//! Single AVL rotations
//!
//! Pure structural transforms on an owned subtree. The caller installs the
//! returned node in the slot the old root occupied. Heights are recomputed
//! child first, then the new subtree root.
//!
//! ```text
//!        y                x
//!       / \   right      / \
//!      x   C  ------>   A   y
//!     / \     <------      / \
//!    A   B     left       B   C
//! ```

use super::node::Node;

/// Right rotation around `old_root`; its left child rises.
///
/// A node without a left child is returned unchanged.
pub(crate) fn rotate_right<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut new_root) = old_root.left.take() else {
        return old_root;
    };
    old_root.left = new_root.right.take();
    old_root.update_height();
    new_root.right = Some(old_root);
    new_root.update_height();
    new_root
}

/// Left rotation around `old_root`; its right child rises.
///
/// A node without a right child is returned unchanged.
pub(crate) fn rotate_left<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut new_root) = old_root.right.take() else {
        return old_root;
    };
    old_root.right = new_root.left.take();
    old_root.update_height();
    new_root.left = Some(old_root);
    new_root.update_height();
    new_root
}
