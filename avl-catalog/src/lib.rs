//! # AVL Catalog - Balanced Index for Labeled Datasets
//!
//! `avl_catalog` keeps an ordered, height-balanced index of dataset entries.
//! Each entry maps a unique key (usually a filename) to a category label and
//! a byte size. Lookups, inserts and deletes run in O(log n); the tree's
//! exact shape can be saved to and restored from a versioned, checksummed
//! snapshot blob.
//!
//! ## Key Features
//!
//! - **Self-balancing**: AVL rotations after every insert and delete
//! - **Size filtering**: copy a half-open size range into a new balanced tree
//! - **Structural queries**: node depth, balance factor, parent, grandparent, uncle
//! - **Traversals**: level order, parent-child edges, ascending order
//! - **Snapshots**: shape-preserving binary format with CRC32 integrity check
//! - **Indexer seam**: plug any [`indexer::DatasetIndexer`] to classify raw keys
//! - **Shared handle**: [`shared::SharedCatalog`] for multi-threaded hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use avl_catalog::tree::AvlTree;
//! use avl_catalog::catalog_config::CatalogConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = AvlTree::new();
//! tree.insert("cat_001.jpg", "Cat", 2048)?;
//! tree.insert("dog_001.jpg", "Dog", 4096)?;
//! tree.insert("car_001.jpg", "Car", 1024)?;
//!
//! // Entries of at least 2 KiB and less than 4 KiB
//! let medium = tree.filter_by_range(2048, 4096)?;
//! assert_eq!(medium.len(), 1);
//!
//! // Persist and restore the exact shape
//! let blob = tree.encode()?;
//! let restored = AvlTree::restore(Some(&blob), CatalogConfig::new());
//! assert_eq!(restored.tree, tree);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`tree`] - The AVL tree: mutation, queries, traversals, invariant checks
//! - [`snapshot`] - Snapshot encoding, decoding and startup recovery
//! - [`indexer`] - Dataset indexer trait and batch indexing
//! - [`shared`] - Thread-safe catalog handle
//! - [`catalog_config`] - Tree configuration
//! - [`catalog_builder`] - Fluent builder for configured trees
//! - [`common`] - Entry type, constants and lock helpers
//! - [`errors`] - Error types and result definitions

pub mod catalog_builder;
pub mod catalog_config;
pub mod common;
pub mod errors;
pub mod indexer;
pub mod shared;
pub mod snapshot;
pub mod tree;

pub use common::Entry;
pub use errors::{CatalogError, CatalogResult, ErrorKind};
pub use tree::AvlTree;
