use std::fmt::{Debug, Formatter};

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::tree::AvlTree;

/// A cloneable, thread-safe handle to one catalog.
///
/// Any number of readers may query the tree at once; a writer waits until
/// they are done and then has it to itself. Clones share the same tree.
///
/// # Examples
///
/// ```rust
/// use avl_catalog::shared::SharedCatalog;
/// use avl_catalog::tree::AvlTree;
///
/// let catalog = SharedCatalog::new(AvlTree::new());
/// let writer = catalog.clone();
/// std::thread::spawn(move || {
///     writer.write_with(|tree| tree.insert("a.png", "Cat", 10)).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert!(catalog.read_with(|tree| tree.contains("a.png")));
/// ```
#[derive(Clone)]
pub struct SharedCatalog {
    inner: Atomic<AvlTree>,
}

impl SharedCatalog {
    pub fn new(tree: AvlTree) -> Self {
        SharedCatalog {
            inner: atomic(tree),
        }
    }

    /// Runs `f` with shared access to the tree.
    pub fn read_with<R>(&self, f: impl FnOnce(&AvlTree) -> R) -> R {
        self.inner.read_with(f)
    }

    /// Runs `f` with exclusive access to the tree.
    ///
    /// Must not be called from inside another `read_with` or `write_with` on
    /// the same catalog.
    pub fn write_with<R>(&self, f: impl FnOnce(&mut AvlTree) -> R) -> R {
        self.inner.write_with(f)
    }

    /// Swaps in `tree`, returning the previous one.
    pub fn replace(&self, tree: AvlTree) -> AvlTree {
        self.write_with(|current| std::mem::replace(current, tree))
    }

    /// Returns a deep copy of the current tree.
    pub fn snapshot_tree(&self) -> AvlTree {
        self.read_with(AvlTree::clone)
    }
}

impl From<AvlTree> for SharedCatalog {
    fn from(tree: AvlTree) -> Self {
        SharedCatalog::new(tree)
    }
}

impl Debug for SharedCatalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.read_with(|tree| f.debug_tuple("SharedCatalog").field(tree).finish())
    }
}
