//! Lazy traversals over an [`AvlTree`].
//!
//! Every iterator here walks an explicit work list instead of recursing, so
//! the call stack stays flat regardless of tree shape. All of them borrow the
//! tree; calling the constructor again (or cloning an iterator) restarts the
//! walk.

use crate::common::Entry;
use crate::tree::{AvlTree, Node, Side};

/// One breadth-first level: its depth (the **root is depth 0**) and the
/// keys found at that depth in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level<'a> {
    pub depth: usize,
    pub keys: Vec<&'a str>,
}

/// Level-order iterator returned by [`AvlTree::levels`].
///
/// Within a level, nodes keep the order in which they were discovered: for
/// each node of the previous level, its left child then its right child.
#[derive(Debug, Clone)]
pub struct LevelOrder<'a> {
    current: Vec<&'a Node>,
    depth: usize,
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = Level<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_empty() {
            return None;
        }

        let mut next = Vec::with_capacity(self.current.len() * 2);
        let mut keys = Vec::with_capacity(self.current.len());
        for node in &self.current {
            keys.push(node.key());
            next.extend(node.left.as_deref());
            next.extend(node.right.as_deref());
        }

        let level = Level {
            depth: self.depth,
            keys,
        };
        self.current = next;
        self.depth += 1;
        Some(level)
    }
}

/// A parent-to-child link, as consumed by graph renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub parent: &'a str,
    pub child: &'a str,
    pub side: Side,
}

/// Pre-order edge iterator returned by [`AvlTree::edges`].
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    stack: Vec<(Edge<'a>, &'a Node)>,
}

impl<'a> Edges<'a> {
    /// Pushes the edges below `node`, right first so the left one pops first.
    fn push_children(&mut self, node: &'a Node) {
        for side in [Side::Right, Side::Left] {
            if let Some(child) = node.child(side) {
                let edge = Edge {
                    parent: node.key(),
                    child: child.key(),
                    side,
                };
                self.stack.push((edge, child));
            }
        }
    }
}

impl<'a> Iterator for Edges<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (edge, child) = self.stack.pop()?;
        self.push_children(child);
        Some(edge)
    }
}

/// In-order (ascending key) iterator returned by [`AvlTree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl AvlTree {
    /// Breadth-first levels starting at the root (depth 0).
    ///
    /// An empty tree yields no levels.
    pub fn levels(&self) -> LevelOrder<'_> {
        LevelOrder {
            current: self.root.as_deref().into_iter().collect(),
            depth: 0,
        }
    }

    /// Every parent-to-child edge in pre-order: the edge to a left child,
    /// then that child's whole subtree, then the edge to the right child.
    pub fn edges(&self) -> Edges<'_> {
        let mut edges = Edges { stack: Vec::new() };
        if let Some(root) = self.root.as_deref() {
            edges.push_children(root);
        }
        edges
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height() as usize),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(Entry::key)
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
