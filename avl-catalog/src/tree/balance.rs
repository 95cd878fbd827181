//! Height bookkeeping and the rotation primitives shared by insert and delete.
//!
//! Both rotations take ownership of the local subtree root and return the new
//! local root; the caller rebinds its own child slot with the result. LR and
//! RL cases are a child rotation followed by the opposite rotation.

use crate::tree::node::{balance, Node};

/// Rotates the subtree rooted at `y` to the right.
///
/// ```text
///         y               x
///        / \             / \
///       x   C    =>     A   y
///      / \                 / \
///     A   B               B   C
/// ```
///
/// Returns `y` unchanged when it has no left child.
pub(crate) fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    log::trace!("rotate right at {}", y.key());

    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Rotates the subtree rooted at `x` to the left. Mirror of [`rotate_right`].
///
/// Returns `x` unchanged when it has no right child.
pub(crate) fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    log::trace!("rotate left at {}", x.key());

    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restores balance at `node` after `key` was inserted below it.
///
/// The rotation is chosen from the sign of the node's balance factor and the
/// position of the inserted key relative to the heavy child's key.
pub(crate) fn rebalance_after_insert(mut node: Box<Node>, key: &str) -> Box<Node> {
    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        let left_key_is_greater = node.left.as_ref().is_some_and(|left| key < left.key());
        if left_key_is_greater {
            return rotate_right(node);
        }
        node.left = node.left.take().map(rotate_left);
        return rotate_right(node);
    }

    if factor < -1 {
        let right_key_is_smaller = node.right.as_ref().is_some_and(|right| key > right.key());
        if right_key_is_smaller {
            return rotate_left(node);
        }
        node.right = node.right.take().map(rotate_right);
        return rotate_left(node);
    }

    node
}

/// Restores balance at `node` after a removal somewhere below it.
///
/// The rotation is chosen from the sign of the heavy child's own balance
/// factor; a child balance of zero takes the single rotation.
pub(crate) fn rebalance_after_delete(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        if balance(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if factor < -1 {
        if balance(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}
