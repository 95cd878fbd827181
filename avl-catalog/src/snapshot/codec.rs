use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::catalog_config::CatalogConfig;
use crate::common::{Entry, CATALOG_VERSION};
use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::snapshot::format::{corrupt, SnapshotHeader};
use crate::tree::{AvlTree, Link, Node};

/// One node of the flattened tree. Children refer to other records by their
/// position in the breadth-first record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct NodeRecord {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) size: u64,
    pub(crate) height: u32,
    pub(crate) left: Option<u32>,
    pub(crate) right: Option<u32>,
}

impl AvlTree {
    /// Serializes the tree, shape and cached heights included, into a
    /// self-describing snapshot blob.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EncodingError`] when the tree is too large to be indexed
    /// by the format or the payload cannot be serialized.
    pub fn encode(&self) -> CatalogResult<Vec<u8>> {
        let records = flatten(self)?;
        let node_count = u32::try_from(records.len()).map_err(|_| {
            CatalogError::new(
                &format!("Cannot encode {} nodes in a snapshot", records.len()),
                ErrorKind::EncodingError,
            )
        })?;

        let payload = postcard::to_stdvec(&records)?;
        let header = SnapshotHeader::for_payload(node_count, &payload);

        let mut blob = Vec::with_capacity(SnapshotHeader::SIZE + payload.len());
        blob.extend_from_slice(&header.encode());
        blob.extend_from_slice(&payload);

        log::debug!(
            "avl_catalog {} encoded snapshot of {} nodes into {} bytes (checksum {:#010x})",
            CATALOG_VERSION,
            node_count,
            blob.len(),
            header.checksum
        );
        Ok(blob)
    }

    /// Rebuilds a tree from a blob produced by [`AvlTree::encode`].
    ///
    /// The decoded tree has exactly the encoded shape and uses `config`.
    /// Stored heights are kept as they are and must agree with the shape.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::CorruptSnapshot`] for a short blob, wrong magic,
    /// unsupported version, nonzero reserved bytes, payload larger than the
    /// configured limit, checksum mismatch, undecodable payload, bytes left
    /// over after the records, or a node graph that is not a valid balanced
    /// search tree.
    pub fn decode(bytes: &[u8], config: CatalogConfig) -> CatalogResult<AvlTree> {
        let (header, payload) = SnapshotHeader::split(bytes)?;

        let limit = config.max_snapshot_bytes();
        if payload.len() > limit {
            return Err(corrupt(&format!(
                "Snapshot payload of {} bytes exceeds the {} byte limit",
                payload.len(),
                limit
            )));
        }
        if config.verify_checksum() {
            header.verify(payload)?;
        }

        let (records, rest): (Vec<NodeRecord>, &[u8]) =
            postcard::take_from_bytes(payload).map_err(|err| {
                CatalogError::new_with_cause(
                    "Snapshot payload cannot be decoded",
                    ErrorKind::CorruptSnapshot,
                    CatalogError::from(err),
                )
            })?;
        if !rest.is_empty() {
            return Err(corrupt(&format!(
                "Snapshot payload has {} trailing bytes after its records",
                rest.len()
            )));
        }
        if records.len() != header.node_count as usize {
            return Err(corrupt(&format!(
                "Snapshot header announces {} nodes but the payload holds {}",
                header.node_count,
                records.len()
            )));
        }

        check_shape(&records)?;
        let len = records.len();
        let tree = AvlTree::from_parts(assemble(records)?, len, config);
        tree.check_invariants().map_err(|err| {
            CatalogError::new_with_cause(
                "Snapshot does not describe a valid tree",
                ErrorKind::CorruptSnapshot,
                err,
            )
        })?;

        log::debug!(
            "avl_catalog {} decoded snapshot of {} nodes, height {}",
            CATALOG_VERSION,
            tree.len(),
            tree.height()
        );
        Ok(tree)
    }
}

/// Breadth-first flattening; a node's children get the next free indices in
/// left, right order, so every child index is larger than its parent's.
fn flatten(tree: &AvlTree) -> CatalogResult<Vec<NodeRecord>> {
    let mut records = Vec::with_capacity(tree.len());
    let mut queue: VecDeque<&Node> = tree.root.as_deref().into_iter().collect();
    let mut next_index: u32 = 1;

    let mut claim = || -> CatalogResult<u32> {
        let index = next_index;
        next_index = next_index.checked_add(1).ok_or_else(|| {
            CatalogError::new("Tree too large for a snapshot", ErrorKind::EncodingError)
        })?;
        Ok(index)
    };

    while let Some(node) = queue.pop_front() {
        let left = node.left.as_deref().map(|_| claim()).transpose()?;
        let right = node.right.as_deref().map(|_| claim()).transpose()?;
        queue.extend(node.left.as_deref());
        queue.extend(node.right.as_deref());

        records.push(NodeRecord {
            key: node.entry.key().to_string(),
            label: node.entry.label().to_string(),
            size: node.entry.size(),
            height: node.height,
            left,
            right,
        });
    }
    Ok(records)
}

/// Validates the record graph before any node is allocated.
///
/// Child indices must point forward and each record other than the root
/// must be claimed exactly once, which makes the graph a tree rooted at
/// index 0. Heights are then recomputed back to front and compared with the
/// stored ones, and balance is checked, so the assembled tree is never
/// deeper than a valid AVL tree of the same size.
fn check_shape(records: &[NodeRecord]) -> CatalogResult<()> {
    let count = records.len();
    let mut claimed = vec![false; count];

    for (index, record) in records.iter().enumerate() {
        for child in [record.left, record.right].into_iter().flatten() {
            let child = child as usize;
            if child <= index || child >= count {
                return Err(corrupt(&format!(
                    "Record {} points to invalid child index {}",
                    index, child
                )));
            }
            if std::mem::replace(&mut claimed[child], true) {
                return Err(corrupt(&format!(
                    "Record {} is referenced by more than one parent",
                    child
                )));
            }
        }
    }
    if let Some(orphan) = claimed.iter().skip(1).position(|claimed| !claimed) {
        return Err(corrupt(&format!("Record {} has no parent", orphan + 1)));
    }

    let mut heights = vec![0u32; count];
    for (index, record) in records.iter().enumerate().rev() {
        let left = record.left.map_or(0, |child| heights[child as usize]);
        let right = record.right.map_or(0, |child| heights[child as usize]);
        if left.abs_diff(right) > 1 {
            return Err(corrupt(&format!(
                "Record {} ({}) is unbalanced",
                index, record.key
            )));
        }
        let expected = 1 + left.max(right);
        if record.height != expected {
            return Err(corrupt(&format!(
                "Record {} ({}) stores height {} but its subtree is {} high",
                index, record.key, record.height, expected
            )));
        }
        heights[index] = expected;
    }
    Ok(())
}

/// Builds nodes back to front so both children of a record already exist
/// when the record itself is built. Expects records accepted by
/// [`check_shape`].
fn assemble(records: Vec<NodeRecord>) -> CatalogResult<Link> {
    let mut slots: Vec<Link> = Vec::new();
    slots.resize_with(records.len(), || None);

    for (index, record) in records.into_iter().enumerate().rev() {
        let mut take = |child: Option<u32>| -> CatalogResult<Link> {
            match child {
                None => Ok(None),
                Some(child) => slots
                    .get_mut(child as usize)
                    .and_then(Option::take)
                    .map(Some)
                    .ok_or_else(|| corrupt(&format!("Record {} has a missing child", index))),
            }
        };
        let left = take(record.left)?;
        let right = take(record.right)?;

        let mut node = Node::new(Entry::new(record.key, record.label, record.size));
        node.height = record.height;
        node.left = left;
        node.right = right;
        slots[index] = Some(node);
    }

    Ok(slots.into_iter().next().flatten())
}
