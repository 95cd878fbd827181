use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::tree::node::height;
use crate::tree::{AvlTree, Node};

impl AvlTree {
    /// Walks the whole tree and verifies its structural invariants: strict
    /// key ordering, cached heights, balance factors within `-1..=1`, and an
    /// entry count matching `len()`.
    ///
    /// A cached height is checked only against its children's cached
    /// heights; since leaves are checked too, consistency at every node
    /// implies every cached height is exact. O(n), iterative.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InternalError`] naming the first violation found.
    pub fn check_invariants(&self) -> CatalogResult<()> {
        let mut count = 0usize;
        // (node, exclusive lower bound, exclusive upper bound)
        let mut stack: Vec<(&Node, Option<&str>, Option<&str>)> = self
            .root
            .as_deref()
            .map(|root| (root, None, None))
            .into_iter()
            .collect();

        while let Some((node, lower, upper)) = stack.pop() {
            count += 1;
            let key = node.key();

            if lower.is_some_and(|low| key <= low) || upper.is_some_and(|high| key >= high) {
                return Err(violation(&format!(
                    "Key {} is out of order (lower bound {:?}, upper bound {:?})",
                    key, lower, upper
                )));
            }

            let expected = 1 + height(&node.left).max(height(&node.right));
            if node.height != expected {
                return Err(violation(&format!(
                    "Node {} caches height {} but its children imply {}",
                    key, node.height, expected
                )));
            }

            let factor = node.balance();
            if !(-1..=1).contains(&factor) {
                return Err(violation(&format!(
                    "Node {} is unbalanced with factor {}",
                    key, factor
                )));
            }

            if let Some(left) = node.left.as_deref() {
                stack.push((left, lower, Some(key)));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, Some(key), upper));
            }
        }

        if count != self.len {
            return Err(violation(&format!(
                "Tree holds {} nodes but records a length of {}",
                count, self.len
            )));
        }
        Ok(())
    }
}

fn violation(message: &str) -> CatalogError {
    log::error!("Invariant violated: {}", message);
    CatalogError::new(message, ErrorKind::InternalError)
}
