//! Configuration management for catalog trees.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::DEFAULT_MAX_SNAPSHOT_BYTES;
use crate::errors::{CatalogError, CatalogResult, ErrorKind};

/// What `insert` does when the key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`ErrorKind::DuplicateKey`] and leave the tree untouched.
    #[default]
    Reject,
    /// Replace the label and size of the existing entry in place.
    Overwrite,
}

impl DuplicatePolicy {
    fn as_u8(self) -> u8 {
        match self {
            DuplicatePolicy::Reject => 0,
            DuplicatePolicy::Overwrite => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => DuplicatePolicy::Overwrite,
            _ => DuplicatePolicy::Reject,
        }
    }
}

/// Public interface for catalog configuration.
///
/// A configuration is shared (not copied) by a tree and every tree derived
/// from it: filter results, clones and decoded snapshots. Settings can be
/// changed until the configuration is handed to a tree; after that it is
/// frozen and setters fail with [`ErrorKind::ValidationError`].
///
/// # Examples
///
/// ```rust
/// use avl_catalog::catalog_config::{CatalogConfig, DuplicatePolicy};
///
/// let config = CatalogConfig::new();
/// config.set_duplicate_policy(DuplicatePolicy::Overwrite).unwrap();
/// assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
/// ```
#[derive(Clone)]
pub struct CatalogConfig {
    inner: Arc<CatalogConfigInner>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        CatalogConfig {
            inner: Arc::new(CatalogConfigInner::new()),
        }
    }

    /// Returns the policy applied when inserting an existing key.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.inner.duplicate_policy()
    }

    /// Sets the duplicate key policy.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is already in use by a tree.
    pub fn set_duplicate_policy(&self, policy: DuplicatePolicy) -> CatalogResult<()> {
        self.inner.set_duplicate_policy(policy)
    }

    /// Returns the largest snapshot payload accepted by the decoder, in bytes.
    pub fn max_snapshot_bytes(&self) -> usize {
        self.inner.max_snapshot_bytes()
    }

    /// Sets the snapshot size limit.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is frozen or if `limit` is zero.
    pub fn set_max_snapshot_bytes(&self, limit: usize) -> CatalogResult<()> {
        self.inner.set_max_snapshot_bytes(limit)
    }

    /// Returns whether decoding verifies the payload checksum.
    pub fn verify_checksum(&self) -> bool {
        self.inner.verify_checksum()
    }

    /// Enables or disables checksum verification on decode.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is frozen.
    pub fn set_verify_checksum(&self, verify: bool) -> CatalogResult<()> {
        self.inner.set_verify_checksum(verify)
    }

    /// Returns `true` once a tree has taken ownership of this configuration.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Relaxed)
    }

    pub(crate) fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::Relaxed);
    }

    /// Returns `true` when both handles point at the same configuration.
    pub fn same_as(&self, other: &CatalogConfig) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for CatalogConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("duplicate_policy", &self.duplicate_policy())
            .field("max_snapshot_bytes", &self.max_snapshot_bytes())
            .field("verify_checksum", &self.verify_checksum())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

struct CatalogConfigInner {
    /// Set once a tree uses this configuration
    frozen: AtomicBool,
    duplicate_policy: AtomicU8,
    max_snapshot_bytes: AtomicUsize,
    verify_checksum: AtomicBool,
}

impl CatalogConfigInner {
    fn new() -> Self {
        CatalogConfigInner {
            frozen: AtomicBool::from(false),
            duplicate_policy: AtomicU8::from(DuplicatePolicy::default().as_u8()),
            max_snapshot_bytes: AtomicUsize::from(DEFAULT_MAX_SNAPSHOT_BYTES),
            verify_checksum: AtomicBool::from(true),
        }
    }

    fn check_mutable(&self, setting: &str) -> CatalogResult<()> {
        if self.frozen.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed once the configuration is in use", setting);
            return Err(CatalogError::new(
                &format!("{} cannot be changed once the configuration is in use", setting),
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::from_u8(self.duplicate_policy.load(Ordering::Relaxed))
    }

    fn set_duplicate_policy(&self, policy: DuplicatePolicy) -> CatalogResult<()> {
        self.check_mutable("Duplicate policy")?;
        self.duplicate_policy.store(policy.as_u8(), Ordering::Relaxed);
        Ok(())
    }

    fn max_snapshot_bytes(&self) -> usize {
        self.max_snapshot_bytes.load(Ordering::Relaxed)
    }

    fn set_max_snapshot_bytes(&self, limit: usize) -> CatalogResult<()> {
        self.check_mutable("Snapshot size limit")?;
        if limit == 0 {
            log::error!("Snapshot size limit cannot be zero");
            return Err(CatalogError::new(
                "Snapshot size limit cannot be zero",
                ErrorKind::ValidationError,
            ));
        }
        self.max_snapshot_bytes.store(limit, Ordering::Relaxed);
        Ok(())
    }

    fn verify_checksum(&self) -> bool {
        self.verify_checksum.load(Ordering::Relaxed)
    }

    fn set_verify_checksum(&self, verify: bool) -> CatalogResult<()> {
        self.check_mutable("Checksum verification")?;
        self.verify_checksum.store(verify, Ordering::Relaxed);
        Ok(())
    }
}
