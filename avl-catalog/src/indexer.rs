//! Seam between the catalog and whatever produces its entries.
//!
//! A [`DatasetIndexer`] turns a raw key (typically an image filename) into
//! the label and byte size the catalog stores for it. Scanning a dataset
//! directory, parsing label files and statting files all live behind this
//! trait, outside the crate.

use crate::errors::{CatalogError, CatalogResult, ErrorKind};
use crate::tree::{AvlTree, InsertOutcome};

/// Satellite data produced for one raw key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub size: u64,
}

impl Classification {
    pub fn new(label: impl Into<String>, size: u64) -> Self {
        Classification {
            label: label.into(),
            size,
        }
    }
}

/// Classifies raw keys into a category label and a byte size.
///
/// Implementations report unknown or unreadable keys with
/// [`ErrorKind::ClassificationFailed`].
pub trait DatasetIndexer {
    fn classify(&self, raw_key: &str) -> CatalogResult<Classification>;
}

impl<T: DatasetIndexer + ?Sized> DatasetIndexer for &T {
    fn classify(&self, raw_key: &str) -> CatalogResult<Classification> {
        (**self).classify(raw_key)
    }
}

/// Outcome of [`AvlTree::index_keys`].
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Keys that created a new entry.
    pub inserted: usize,
    /// Keys that overwrote an existing entry.
    pub replaced: usize,
    /// Keys that were skipped, with the reason.
    pub failed: Vec<(String, CatalogError)>,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of keys the batch looked at.
    pub fn total(&self) -> usize {
        self.inserted + self.replaced + self.failed.len()
    }
}

impl AvlTree {
    /// Classifies `raw_key` and inserts the result.
    ///
    /// # Errors
    ///
    /// Whatever the indexer returns, or [`ErrorKind::DuplicateKey`] from the
    /// insert under the reject policy.
    pub fn index_key<I: DatasetIndexer + ?Sized>(
        &mut self,
        indexer: &I,
        raw_key: &str,
    ) -> CatalogResult<InsertOutcome> {
        let Classification { label, size } = indexer.classify(raw_key)?;
        self.insert(raw_key, label, size)
    }

    /// Indexes every key from `raw_keys`.
    ///
    /// A key that cannot be classified or inserted is recorded in the report
    /// and logged; the batch carries on with the next key.
    pub fn index_keys<I, K, S>(&mut self, indexer: &I, raw_keys: K) -> IndexReport
    where
        I: DatasetIndexer + ?Sized,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IndexReport::default();
        for raw_key in raw_keys {
            let raw_key = raw_key.as_ref();
            match self.index_key(indexer, raw_key) {
                Ok(InsertOutcome::Inserted) => report.inserted += 1,
                Ok(InsertOutcome::Replaced(_)) => report.replaced += 1,
                Err(err) => {
                    log::warn!("Skipping {}: {}", raw_key, err);
                    report.failed.push((raw_key.to_string(), err));
                }
            }
        }

        log::debug!(
            "Indexed {} keys: {} inserted, {} replaced, {} failed",
            report.total(),
            report.inserted,
            report.replaced,
            report.failed.len()
        );
        report
    }
}

/// Convenience error for indexer implementations.
pub fn classification_failed(raw_key: &str, reason: &str) -> CatalogError {
    CatalogError::new(
        &format!("Cannot classify {}: {}", raw_key, reason),
        ErrorKind::ClassificationFailed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_config::DuplicatePolicy;
    use std::collections::HashMap;

    struct LabelTable {
        entries: HashMap<String, (String, u64)>,
    }

    impl LabelTable {
        fn new(rows: &[(&str, &str, u64)]) -> Self {
            LabelTable {
                entries: rows
                    .iter()
                    .map(|(k, l, s)| (k.to_string(), (l.to_string(), *s)))
                    .collect(),
            }
        }
    }

    impl DatasetIndexer for LabelTable {
        fn classify(&self, raw_key: &str) -> CatalogResult<Classification> {
            self.entries
                .get(raw_key)
                .map(|(label, size)| Classification::new(label.clone(), *size))
                .ok_or_else(|| classification_failed(raw_key, "no label recorded"))
        }
    }

    fn table() -> LabelTable {
        LabelTable::new(&[
            ("cat_001.jpg", "Cat", 2048),
            ("dog_001.jpg", "Dog", 4096),
            ("car_001.jpg", "Car", 1024),
        ])
    }

    #[test]
    fn index_key_inserts_classification() {
        let mut tree = AvlTree::new();
        tree.index_key(&table(), "dog_001.jpg").unwrap();
        let entry = tree.search("dog_001.jpg").unwrap();
        assert_eq!((entry.label(), entry.size()), ("Dog", 4096));
    }

    #[test]
    fn index_key_propagates_classification_failure() {
        let mut tree = AvlTree::new();
        let err = tree.index_key(&table(), "unknown.jpg").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ClassificationFailed);
        assert!(tree.is_empty());
    }

    #[test]
    fn index_keys_collects_failures_without_aborting() {
        let mut tree = AvlTree::new();
        let report = tree.index_keys(
            &table(),
            ["cat_001.jpg", "missing.png", "dog_001.jpg", "cat_001.jpg", "car_001.jpg"],
        );
        assert_eq!(report.inserted, 3);
        assert_eq!(report.replaced, 0);
        assert_eq!(report.total(), 5);
        assert!(!report.is_complete());

        let kinds: Vec<(&str, &ErrorKind)> = report
            .failed
            .iter()
            .map(|(key, err)| (key.as_str(), err.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("missing.png", &ErrorKind::ClassificationFailed),
                ("cat_001.jpg", &ErrorKind::DuplicateKey),
            ]
        );
        assert_eq!(tree.len(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn index_keys_counts_overwrites() {
        let mut tree = AvlTree::builder()
            .duplicate_policy(DuplicatePolicy::Overwrite)
            .build()
            .unwrap();
        let keys = vec!["cat_001.jpg".to_string(), "cat_001.jpg".to_string()];
        let report = tree.index_keys(&table(), &keys);
        assert_eq!((report.inserted, report.replaced), (1, 1));
        assert!(report.is_complete());
    }

    #[test]
    fn trait_objects_are_accepted() {
        let indexer: Box<dyn DatasetIndexer> = Box::new(table());
        let mut tree = AvlTree::new();
        let report = tree.index_keys(indexer.as_ref(), ["car_001.jpg"]);
        assert_eq!(report.inserted, 1);
    }
}
