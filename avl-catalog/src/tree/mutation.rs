use std::cmp::Ordering;

use crate::catalog_config::DuplicatePolicy;
use crate::common::Entry;
use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::tree::balance::{rebalance_after_delete, rebalance_after_insert};
use crate::tree::{AvlTree, Link, Node};

/// Result of a successful [`AvlTree::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new node was created.
    Inserted,
    /// The key existed and the overwrite policy replaced its label and size.
    /// Holds the entry as it was before the call.
    Replaced(Entry),
}

impl AvlTree {
    /// Inserts `key` with its label and size, rebalancing on the way back up.
    ///
    /// When the key already exists the configured
    /// [`DuplicatePolicy`](crate::catalog_config::DuplicatePolicy) decides:
    /// `Reject` fails with [`ErrorKind::DuplicateKey`] and leaves the tree
    /// untouched, `Overwrite` replaces label and size in place.
    ///
    /// O(log n).
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        size: u64,
    ) -> CatalogResult<InsertOutcome> {
        self.insert_entry(Entry::new(key, label, size))
    }

    /// Inserts a prepared [`Entry`]. See [`AvlTree::insert`].
    pub fn insert_entry(&mut self, entry: Entry) -> CatalogResult<InsertOutcome> {
        let policy = self.config().duplicate_policy();
        let key = entry.key().to_string();
        let outcome = insert_into(&mut self.root, &key, entry, policy)?;
        if outcome == InsertOutcome::Inserted {
            self.len += 1;
        }
        Ok(outcome)
    }

    /// Removes `key` and returns its entry.
    ///
    /// An absent key is a no-op that returns `None`; use
    /// [`AvlTree::delete_existing`] to treat it as an error instead.
    ///
    /// O(log n).
    pub fn delete(&mut self, key: &str) -> Option<Entry> {
        let removed = delete_from(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Removes `key`, failing with [`ErrorKind::NotFound`] if it is absent.
    pub fn delete_existing(&mut self, key: &str) -> CatalogResult<Entry> {
        self.delete(key).ok_or_else(|| {
            log::error!("Cannot delete {}: key not found", key);
            CatalogError::new(
                &format!("Cannot delete {}: key not found", key),
                ErrorKind::NotFound,
            )
        })
    }
}

fn insert_into(
    slot: &mut Link,
    key: &str,
    entry: Entry,
    policy: DuplicatePolicy,
) -> CatalogResult<InsertOutcome> {
    let Some(node) = slot.as_mut() else {
        *slot = Some(Node::new(entry));
        return Ok(InsertOutcome::Inserted);
    };

    let outcome = match key.cmp(node.key()) {
        Ordering::Less => insert_into(&mut node.left, key, entry, policy)?,
        Ordering::Greater => insert_into(&mut node.right, key, entry, policy)?,
        Ordering::Equal => {
            return match policy {
                DuplicatePolicy::Reject => {
                    log::error!("Key {} already exists", key);
                    Err(CatalogError::new(
                        &format!("Key {} already exists", key),
                        ErrorKind::DuplicateKey,
                    ))
                }
                DuplicatePolicy::Overwrite => {
                    let (_, label, size) = entry.into_parts();
                    Ok(InsertOutcome::Replaced(node.entry.replace_satellite(label, size)))
                }
            };
        }
    };

    Ok(rebalance_slot(slot, outcome, key))
}

/// Rebinds `slot` with its rebalanced subtree when a node was created below it.
fn rebalance_slot(slot: &mut Link, outcome: InsertOutcome, key: &str) -> InsertOutcome {
    if outcome == InsertOutcome::Inserted {
        if let Some(node) = slot.take() {
            *slot = Some(rebalance_after_insert(node, key));
        }
    }
    outcome
}

fn delete_from(slot: &mut Link, key: &str) -> Option<Entry> {
    let node = slot.as_mut()?;

    let removed = match key.cmp(node.key()) {
        Ordering::Less => delete_from(&mut node.left, key)?,
        Ordering::Greater => delete_from(&mut node.right, key)?,
        Ordering::Equal => {
            if node.left.is_none() || node.right.is_none() {
                // leaf or single child: splice the child (if any) into the slot
                let mut removed = slot.take()?;
                *slot = removed.left.take().or_else(|| removed.right.take());
                return Some(removed.entry);
            }

            // two children: copy the in-order successor up, then remove it below
            let successor = min_entry(&node.right)?.clone();
            let successor_key = successor.key().to_string();
            let removed = std::mem::replace(&mut node.entry, successor);
            delete_from(&mut node.right, &successor_key)?;
            removed
        }
    };

    if let Some(node) = slot.take() {
        *slot = Some(rebalance_after_delete(node));
    }
    Some(removed)
}

/// Leftmost entry of a subtree.
fn min_entry(link: &Link) -> Option<&Entry> {
    let mut current = link.as_deref()?;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    Some(&current.entry)
}
