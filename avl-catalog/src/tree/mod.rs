//! The balanced-tree engine.
//!
//! [`AvlTree`] keeps its entries ordered by key and height-balanced after
//! every mutation. The implementation is split by concern:
//!
//! - `node` - node layout and height/balance helpers
//! - `balance` - the two rotation primitives and the insert/delete rebalance rules
//! - `mutation` - `insert`, `delete`
//! - `query` - point lookup, range filter, depth and ancestor queries
//! - `traversal` - level-order, edge and in-order iterators
//! - `validate` - structural invariant checks
//!
//! # Invariants
//!
//! After every public operation returns:
//! - every key in a node's left subtree is smaller than the node's key, and
//!   every key in its right subtree is larger;
//! - the heights of a node's two subtrees differ by at most one;
//! - each node's cached height is one more than its taller child's;
//! - keys are unique.

mod balance;
mod mutation;
mod node;
mod query;
mod traversal;
mod validate;

pub use mutation::*;
pub use traversal::*;

use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;

use crate::catalog_builder::CatalogBuilder;
use crate::catalog_config::CatalogConfig;
use crate::common::Entry;
pub(crate) use node::{Link, Node};

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A self-balancing (AVL) ordered catalog of [`Entry`] records.
///
/// The tree exclusively owns its nodes; `clone()` performs a deep copy that
/// shares only the [`CatalogConfig`].
///
/// # Examples
///
/// ```rust
/// use avl_catalog::tree::AvlTree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut tree = AvlTree::new();
/// tree.insert("a", "Cat", 100)?;
/// tree.insert("b", "Dog", 200)?;
/// tree.insert("c", "Cat", 50)?;
///
/// assert_eq!(tree.root().map(|e| e.key()), Some("b"));
/// assert_eq!(tree.balance_factor("b"), Some(0));
/// assert_eq!(tree.search("c").map(|e| e.size()), Some(50));
/// # Ok(())
/// # }
/// ```
pub struct AvlTree {
    pub(crate) root: Link,
    pub(crate) len: usize,
    config: CatalogConfig,
}

impl Default for AvlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AvlTree {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        AvlTree::with_config(CatalogConfig::new())
    }

    /// Creates an empty tree using `config`. The configuration is frozen.
    pub fn with_config(config: CatalogConfig) -> Self {
        config.freeze();
        AvlTree {
            root: None,
            len: 0,
            config,
        }
    }

    /// Returns a builder for a configured tree.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Creates an empty tree sharing this tree's configuration.
    pub fn empty_like(&self) -> Self {
        AvlTree::with_config(self.config.clone())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree; 0 when empty, 1 for a single entry.
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    /// The root entry, if any.
    pub fn root(&self) -> Option<&Entry> {
        self.root.as_deref().map(|node| &node.entry)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn from_parts(root: Link, len: usize, config: CatalogConfig) -> Self {
        config.freeze();
        AvlTree { root, len, config }
    }
}

impl Clone for AvlTree {
    fn clone(&self) -> Self {
        AvlTree {
            root: self.root.clone(),
            len: self.len,
            config: self.config.clone(),
        }
    }
}

impl PartialEq for AvlTree {
    /// Two trees are equal when they have the same shape and the same entries
    /// in every position. Configuration is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.root == other.root
    }
}

impl Debug for AvlTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvlTree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field(
                "levels",
                &self
                    .levels()
                    .map(|level| format!("{}: {}", level.depth, level.keys.iter().join(" ")))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
