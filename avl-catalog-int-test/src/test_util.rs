use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::{env, fs};

use avl_catalog::catalog_config::CatalogConfig;
use avl_catalog::errors::CatalogResult;
use avl_catalog::indexer::{classification_failed, Classification, DatasetIndexer};
use avl_catalog::shared::SharedCatalog;
use avl_catalog::tree::AvlTree;
use avl_catalog::Entry;
use fake::faker::filesystem::en::FileName;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Category labels used by generated datasets.
pub const LABELS: [&str; 8] = ["Cat", "Dog", "Horse", "Human", "Car", "Bike", "Flower", "Fruit"];

/// Runs `test` against a fresh context and always runs `after`, even when
/// the test fails or panics.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    B: Fn() -> CatalogResult<TestContext>,
    T: Fn(TestContext) -> CatalogResult<()>,
    A: Fn(TestContext) -> CatalogResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    if let Err(e) = after(ctx) {
        eprintln!("Warning: after run failed: {:?}", e);
    }

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// A catalog plus a scratch file path for snapshot tests.
#[derive(Clone)]
pub struct TestContext {
    path: PathBuf,
    catalog: SharedCatalog,
}

impl TestContext {
    pub fn new(path: PathBuf, catalog: SharedCatalog) -> Self {
        Self { path, catalog }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }
}

pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("{}.avlc", id))
}

pub fn create_test_context() -> CatalogResult<TestContext> {
    Ok(TestContext::new(
        random_path(),
        SharedCatalog::new(AvlTree::new()),
    ))
}

/// Context whose catalog overwrites duplicates instead of rejecting them.
pub fn create_overwrite_context() -> CatalogResult<TestContext> {
    let tree = AvlTree::builder()
        .duplicate_policy(avl_catalog::catalog_config::DuplicatePolicy::Overwrite)
        .build()?;
    Ok(TestContext::new(random_path(), SharedCatalog::new(tree)))
}

pub fn cleanup(ctx: TestContext) -> CatalogResult<()> {
    match fs::remove_file(ctx.path()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Generates `count` entries with unique, fake filenames, in shuffled order.
///
/// The same seed always yields the same dataset.
pub fn generate_entries(count: usize, seed: u64) -> Vec<Entry> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entries: Vec<Entry> = (0..count)
        .map(|i| {
            let name: String = FileName().fake_with_rng(&mut rng);
            let label = LABELS[rng.random_range(0..LABELS.len())];
            let size: u64 = rng.random_range(1..5_000_000);
            Entry::new(format!("{:06}_{}", i, name), label, size)
        })
        .collect();
    entries.shuffle(&mut rng);
    entries
}

/// Builds a tree by inserting `entries` in order.
pub fn tree_from(entries: &[Entry], config: CatalogConfig) -> CatalogResult<AvlTree> {
    let mut tree = AvlTree::with_config(config);
    for entry in entries {
        tree.insert_entry(entry.clone())?;
    }
    Ok(tree)
}

/// Indexer answering from a fixed table, standing in for a labelled
/// dataset directory.
pub struct TableIndexer {
    table: HashMap<String, Classification>,
}

impl TableIndexer {
    pub fn from_entries(entries: &[Entry]) -> Self {
        TableIndexer {
            table: entries
                .iter()
                .map(|e| (e.key().to_string(), Classification::new(e.label(), e.size())))
                .collect(),
        }
    }
}

impl DatasetIndexer for TableIndexer {
    fn classify(&self, raw_key: &str) -> CatalogResult<Classification> {
        self.table
            .get(raw_key)
            .cloned()
            .ok_or_else(|| classification_failed(raw_key, "no label file entry"))
    }
}
