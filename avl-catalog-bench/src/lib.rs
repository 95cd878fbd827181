//! AVL Catalog Benchmark Library
//!
//! Data generators and snapshot file helpers shared by the criterion
//! benches.

pub mod data_gen;
pub mod files;
