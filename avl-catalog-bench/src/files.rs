//! Snapshot file helpers for benchmarks

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use avl_catalog::catalog_config::CatalogConfig;
use avl_catalog::errors::CatalogResult;
use avl_catalog::tree::AvlTree;
use tempfile::TempDir;
use uuid::Uuid;

/// A scratch directory removed when the context is dropped
pub struct SnapshotDir {
    dir: TempDir,
}

impl SnapshotDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(SnapshotDir {
            dir: tempfile::tempdir()?,
        })
    }

    /// A fresh, not yet existing snapshot path inside the directory
    pub fn unique_path(&self) -> PathBuf {
        self.dir.path().join(format!("{}.avlc", Uuid::new_v4()))
    }
}

/// Save a tree through a buffered file writer
pub fn save(tree: &AvlTree, path: &Path) -> CatalogResult<()> {
    tree.write_to(BufWriter::new(File::create(path)?))
}

/// Load a tree through a buffered file reader
pub fn load(path: &Path) -> CatalogResult<AvlTree> {
    AvlTree::read_from(BufReader::new(File::open(path)?), CatalogConfig::new())
}
