//! Snapshot persistence.
//!
//! A snapshot is a byte blob holding a fixed header (magic, format version,
//! node count, CRC32) followed by a postcard-encoded list of node records in
//! breadth-first order. Decoding reproduces the exact shape of the encoded
//! tree, so a restored catalog answers depth and ancestor queries the same
//! way the saved one did.
//!
//! The crate never opens files itself. Hosts either move blobs around with
//! [`AvlTree::encode`] / [`AvlTree::decode`], or hand a reader or writer to
//! [`AvlTree::read_from`] / [`AvlTree::write_to`].

mod codec;
mod format;

use std::io::{Read, Write};

use crate::catalog_config::CatalogConfig;
use crate::common::SNAPSHOT_HEADER_SIZE;
use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::tree::AvlTree;

/// Result of [`AvlTree::restore`]: always a usable tree, plus the reason it
/// is empty when the snapshot could not be used.
#[derive(Debug)]
pub struct Restored {
    pub tree: AvlTree,
    pub warning: Option<CatalogError>,
}

impl Restored {
    /// `true` when the tree came from the snapshot rather than a fallback.
    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }
}

impl AvlTree {
    /// Startup recovery: decodes `snapshot` if there is one, otherwise, or if
    /// it is unusable, starts from an empty tree.
    ///
    /// Never fails. A missing snapshot is reported as
    /// [`ErrorKind::NotFound`], an unusable one with the decode error; both
    /// are logged at `warn`.
    pub fn restore(snapshot: Option<&[u8]>, config: CatalogConfig) -> Restored {
        let Some(bytes) = snapshot else {
            let warning = CatalogError::new("No snapshot to restore from", ErrorKind::NotFound);
            log::warn!("{}, starting with an empty catalog", warning);
            return Restored {
                tree: AvlTree::with_config(config),
                warning: Some(warning),
            };
        };

        match AvlTree::decode(bytes, config.clone()) {
            Ok(tree) => Restored {
                tree,
                warning: None,
            },
            Err(err) => {
                log::warn!(
                    "Discarding unusable snapshot of {} bytes, starting with an empty catalog: {}",
                    bytes.len(),
                    err
                );
                Restored {
                    tree: AvlTree::with_config(config),
                    warning: Some(err),
                }
            }
        }
    }

    /// Encodes the tree and writes the snapshot to `writer`, then flushes it.
    pub fn write_to<W: Write>(&self, mut writer: W) -> CatalogResult<()> {
        let blob = self.encode()?;
        writer.write_all(&blob)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a snapshot from `reader` and decodes it.
    ///
    /// At most one byte more than the configured limit is read, so an
    /// oversized stream is rejected without being buffered whole.
    pub fn read_from<R: Read>(reader: R, config: CatalogConfig) -> CatalogResult<AvlTree> {
        let cap = SNAPSHOT_HEADER_SIZE
            .saturating_add(config.max_snapshot_bytes())
            .saturating_add(1);
        let mut bytes = Vec::new();
        reader.take(cap as u64).read_to_end(&mut bytes)?;
        AvlTree::decode(&bytes, config)
    }
}
