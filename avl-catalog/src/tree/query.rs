use std::cmp::Ordering;

use crate::catalog_config::DuplicatePolicy;
use crate::common::Entry;
use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::tree::{AvlTree, Node};

impl AvlTree {
    /// Looks up `key`. O(log n), no side effects.
    pub fn search(&self, key: &str) -> Option<&Entry> {
        self.find_node(key).map(|node| &node.entry)
    }

    /// Looks up `key`, failing with [`ErrorKind::NotFound`] when absent.
    pub fn get(&self, key: &str) -> CatalogResult<&Entry> {
        self.search(key).ok_or_else(|| {
            CatalogError::new(&format!("Key {} not found", key), ErrorKind::NotFound)
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find_node(key).is_some()
    }

    /// Copies every entry with `min_inclusive <= size < max_exclusive` into a
    /// fresh tree sharing this tree's configuration.
    ///
    /// Entries are inserted through the normal insertion path, so the result
    /// is itself a balanced tree. The source tree is not modified. O(n).
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRange`] when `max_exclusive <= min_inclusive`.
    pub fn filter_by_range(&self, min_inclusive: u64, max_exclusive: u64) -> CatalogResult<AvlTree> {
        let mut result = self.empty_like();
        self.filter_by_range_into(min_inclusive, max_exclusive, &mut result)?;
        Ok(result)
    }

    /// Like [`AvlTree::filter_by_range`] but inserts into a caller supplied
    /// tree. Returns the number of entries inserted or replaced.
    ///
    /// Insertion into `target` follows the target's duplicate policy; with
    /// `Reject` a matching key already present in `target` fails with
    /// [`ErrorKind::DuplicateKey`] before anything is inserted, leaving
    /// `target` unchanged.
    pub fn filter_by_range_into(
        &self,
        min_inclusive: u64,
        max_exclusive: u64,
        target: &mut AvlTree,
    ) -> CatalogResult<usize> {
        if max_exclusive <= min_inclusive {
            log::error!(
                "Invalid size range [{}, {}): upper bound must exceed lower bound",
                min_inclusive,
                max_exclusive
            );
            return Err(CatalogError::new(
                &format!(
                    "Invalid size range [{}, {}): upper bound must exceed lower bound",
                    min_inclusive, max_exclusive
                ),
                ErrorKind::InvalidRange,
            ));
        }

        // pre-order: node, then its left subtree, then its right subtree
        let mut matches: Vec<&Entry> = Vec::new();
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.entry.size_in(min_inclusive, max_exclusive) {
                matches.push(&node.entry);
            }
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }

        if target.config().duplicate_policy() == DuplicatePolicy::Reject {
            if let Some(clash) = matches.iter().find(|entry| target.contains(entry.key())) {
                log::error!("Key {} already exists in the filter target", clash.key());
                return Err(CatalogError::new(
                    &format!("Key {} already exists in the filter target", clash.key()),
                    ErrorKind::DuplicateKey,
                ));
            }
        }

        for entry in &matches {
            target.insert_entry((*entry).clone())?;
        }
        Ok(matches.len())
    }

    /// Depth of `key` with the **root at level 1**.
    ///
    /// This is one more than the `depth` reported by
    /// [`AvlTree::levels`], which counts the root as level 0.
    /// Returns `None` when the key is absent.
    ///
    /// Searches depth-first, left subtree before right, and stops at the
    /// first match.
    pub fn node_level(&self, key: &str) -> Option<usize> {
        let mut stack: Vec<(&Node, usize)> = self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, level)) = stack.pop() {
            if node.key() == key {
                return Some(level);
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, level + 1));
            }
            if let Some(left) = node.left.as_deref() {
                stack.push((left, level + 1));
            }
        }
        None
    }

    /// Height of the node's left subtree minus its right subtree, or `None`
    /// when the key is absent.
    pub fn balance_factor(&self, key: &str) -> Option<i32> {
        self.find_node(key).map(Node::balance)
    }

    /// The parent entry of `key`. The root and absent keys have no parent.
    pub fn find_parent(&self, key: &str) -> Option<&Entry> {
        self.find_parent_node(key).map(|node| &node.entry)
    }

    /// The parent of the parent of `key`.
    pub fn find_grandparent(&self, key: &str) -> Option<&Entry> {
        self.find_grandparent_node(key).map(|node| &node.entry)
    }

    /// The sibling of `key`'s parent.
    ///
    /// `None` when `key` has no grandparent: it is the root, a child of the
    /// root, or absent. The grandparent's other slot is never empty in a
    /// balanced tree, since its two subtrees would then differ by two levels.
    pub fn find_uncle(&self, key: &str) -> Option<&Entry> {
        let parent = self.find_parent_node(key)?;
        let grandparent = self.find_grandparent_node(key)?;

        let uncle = match grandparent.left.as_deref() {
            Some(left) if left.key() == parent.key() => grandparent.right.as_deref(),
            _ => grandparent.left.as_deref(),
        };
        uncle.map(|node| &node.entry)
    }

    fn find_node(&self, key: &str) -> Option<&Node> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    fn find_parent_node(&self, key: &str) -> Option<&Node> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.key() == key {
                return None;
            }
            let child_matches = |child: Option<&Node>| child.is_some_and(|c| c.key() == key);
            if child_matches(node.left.as_deref()) || child_matches(node.right.as_deref()) {
                return Some(node);
            }
            current = if key < node.key() {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }
        None
    }

    fn find_grandparent_node(&self, key: &str) -> Option<&Node> {
        let parent = self.find_parent_node(key)?;
        self.find_parent_node(parent.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds
    /// ```text
    ///            h
    ///        d       l
    ///      b   f   j   n
    ///     a c e g i k m o
    /// ```
    fn full_tree() -> AvlTree {
        let mut tree = AvlTree::new();
        for (i, key) in ["h", "d", "l", "b", "f", "j", "n", "a", "c", "e", "g", "i", "k", "m", "o"]
            .iter()
            .enumerate()
        {
            tree.insert(*key, if i % 2 == 0 { "Cat" } else { "Dog" }, (i as u64 + 1) * 10)
                .unwrap();
        }
        tree
    }

    #[test]
    fn search_found_and_missing() {
        let tree = full_tree();
        let entry = tree.search("f").unwrap();
        assert_eq!((entry.key(), entry.label(), entry.size()), ("f", "Cat", 50));
        assert!(tree.search("z").is_none());
        assert!(AvlTree::new().search("a").is_none());
    }

    #[test]
    fn get_reports_not_found() {
        let tree = full_tree();
        assert_eq!(tree.get("a").unwrap().key(), "a");
        assert_eq!(tree.get("zz").unwrap_err().kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn filter_by_range_selects_half_open_interval() {
        let tree = full_tree();
        let filtered = tree.filter_by_range(30, 80).unwrap();

        let mut sizes: Vec<u64> = filtered.iter().map(Entry::size).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![30, 40, 50, 60, 70]);
        filtered.check_invariants().unwrap();
        assert!(filtered.config().same_as(tree.config()));
        assert_eq!(tree.len(), 15);
    }

    #[test]
    fn filter_by_range_rejects_empty_interval() {
        let tree = full_tree();
        let err = tree.filter_by_range(100, 100).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidRange);
        let err = tree.filter_by_range(100, 10).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidRange);
    }

    #[test]
    fn filter_by_range_into_reports_count() {
        let tree = full_tree();
        let mut target = AvlTree::new();
        assert_eq!(tree.filter_by_range_into(0, 1000, &mut target).unwrap(), 15);
        assert_eq!(target.len(), 15);
        assert_eq!(tree.filter_by_range_into(1000, 2000, &mut AvlTree::new()).unwrap(), 0);
    }

    #[test]
    fn filter_by_range_into_respects_target_policy() {
        let tree = full_tree();
        let mut target = AvlTree::new();
        target.insert("k", "Horse", 10).unwrap();
        let before = target.clone();

        let err = tree.filter_by_range_into(0, 1000, &mut target).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
        assert_eq!(target.len(), 1);
        assert_eq!(target, before);
        assert_eq!(target.search("k").unwrap().label(), "Horse");
    }

    #[test]
    fn filter_by_range_into_copies_when_target_has_no_clash() {
        let tree = full_tree();
        let mut target = AvlTree::new();
        target.insert("zz", "Horse", 10).unwrap();
        // sizes are (index + 1) * 10, so [100, 1000) keeps e, g, i, k, m and o
        let copied = tree.filter_by_range_into(100, 1000, &mut target).unwrap();
        assert_eq!(copied, 6);
        assert_eq!(target.len(), 7);
        target.check_invariants().unwrap();
    }

    #[test]
    fn filter_by_range_into_overwrite_replaces_existing() {
        let tree = full_tree();
        let mut target = AvlTree::builder()
            .duplicate_policy(DuplicatePolicy::Overwrite)
            .build()
            .unwrap();
        target.insert("a", "Horse", 1).unwrap();

        assert_eq!(tree.filter_by_range_into(0, 1000, &mut target).unwrap(), 15);
        assert_eq!(target.len(), 15);
        assert_eq!(target.search("a").unwrap().label(), "Dog");
    }

    #[test]
    fn node_level_is_one_based() {
        let tree = full_tree();
        assert_eq!(tree.node_level("h"), Some(1));
        assert_eq!(tree.node_level("d"), Some(2));
        assert_eq!(tree.node_level("f"), Some(3));
        assert_eq!(tree.node_level("o"), Some(4));
        assert_eq!(tree.node_level("missing"), None);
    }

    #[test]
    fn balance_factor_of_nodes() {
        let mut tree = AvlTree::new();
        for key in ["b", "a", "c", "d"] {
            tree.insert(key, "Cat", 1).unwrap();
        }
        assert_eq!(tree.balance_factor("b"), Some(-1));
        assert_eq!(tree.balance_factor("c"), Some(-1));
        assert_eq!(tree.balance_factor("d"), Some(0));
        assert_eq!(tree.balance_factor("x"), None);
    }

    #[test]
    fn parent_and_grandparent() {
        let tree = full_tree();
        assert!(tree.find_parent("h").is_none());
        assert_eq!(tree.find_parent("d").unwrap().key(), "h");
        assert_eq!(tree.find_parent("g").unwrap().key(), "f");
        assert!(tree.find_parent("zz").is_none());

        assert_eq!(tree.find_grandparent("g").unwrap().key(), "d");
        assert!(tree.find_grandparent("d").is_none());
        assert!(tree.find_grandparent("h").is_none());
    }

    #[test]
    fn uncle_is_parents_sibling() {
        let tree = full_tree();
        assert_eq!(tree.find_uncle("a").unwrap().key(), "f");
        assert_eq!(tree.find_uncle("g").unwrap().key(), "b");
        assert_eq!(tree.find_uncle("f").unwrap().key(), "l");
        assert_eq!(tree.find_uncle("m").unwrap().key(), "j");
    }

    #[test]
    fn child_of_root_has_no_uncle() {
        let tree = full_tree();
        assert!(tree.find_uncle("d").is_none());
        assert!(tree.find_uncle("l").is_none());
        assert!(tree.find_uncle("h").is_none());
    }

    #[test]
    fn uncle_follows_rotation() {
        // b(a, c(-, d)): d's parent is c, grandparent b, uncle a
        let mut tree = AvlTree::new();
        for key in ["b", "a", "c", "d"] {
            tree.insert(key, "Cat", 1).unwrap();
        }
        assert_eq!(tree.find_uncle("d").unwrap().key(), "a");

        tree.delete("a");
        // rotation makes c the root: c(b, d)
        assert!(tree.find_uncle("d").is_none());
    }
}
