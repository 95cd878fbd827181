use crate::catalog_config::{CatalogConfig, DuplicatePolicy};
use crate::errors::{CatalogError, CatalogResult};
use crate::tree::AvlTree;

/// Builder for creating and configuring an [`AvlTree`].
///
/// The builder captures the first configuration error and returns it from
/// [`CatalogBuilder::build`], so a chain of setters never has to be checked
/// step by step.
///
/// # Examples
///
/// ```rust
/// use avl_catalog::catalog_config::DuplicatePolicy;
/// use avl_catalog::tree::AvlTree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = AvlTree::builder()
///     .duplicate_policy(DuplicatePolicy::Overwrite)
///     .max_snapshot_bytes(1 << 20)
///     .build()?;
/// assert!(tree.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct CatalogBuilder {
    error: Option<CatalogError>,
    config: CatalogConfig,
}

impl CatalogBuilder {
    /// Creates a builder with the default configuration
    /// (reject duplicates, 64 MiB snapshot limit, checksum verification on).
    pub fn new() -> Self {
        CatalogBuilder {
            error: None,
            config: CatalogConfig::new(),
        }
    }

    /// Sets the policy applied when an inserted key already exists.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_duplicate_policy(policy) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the largest snapshot payload the decoder accepts.
    ///
    /// A zero limit is captured as an error and returned by `build()`.
    pub fn max_snapshot_bytes(mut self, limit: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_snapshot_bytes(limit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Enables or disables checksum verification when decoding snapshots.
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_verify_checksum(verify) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Returns the configuration without building a tree, e.g. to decode a
    /// snapshot with it.
    pub fn build_config(self) -> CatalogResult<CatalogConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(self.config)
    }

    /// Builds an empty tree with the configured settings.
    pub fn build(self) -> CatalogResult<AvlTree> {
        let config = self.build_config()?;
        Ok(AvlTree::with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_new() {
        let builder = CatalogBuilder::new();
        assert!(builder.error.is_none());
        assert_eq!(builder.config.duplicate_policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_build_applies_settings() {
        let tree = CatalogBuilder::new()
            .duplicate_policy(DuplicatePolicy::Overwrite)
            .max_snapshot_bytes(4096)
            .verify_checksum(false)
            .build()
            .unwrap();

        let config = tree.config();
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
        assert_eq!(config.max_snapshot_bytes(), 4096);
        assert!(!config.verify_checksum());
        assert!(config.is_frozen());
    }

    #[test]
    fn test_error_captured_and_returned() {
        let result = CatalogBuilder::new().max_snapshot_bytes(0).build();
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_builder_early_exit_on_first_error() {
        let builder = CatalogBuilder::new()
            .max_snapshot_bytes(0)
            .duplicate_policy(DuplicatePolicy::Overwrite);

        // the setter after the failure is skipped
        assert_eq!(builder.config.duplicate_policy(), DuplicatePolicy::Reject);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_build_config_not_frozen() {
        let config = CatalogBuilder::new().verify_checksum(false).build_config().unwrap();
        assert!(!config.is_frozen());
        assert!(!config.verify_checksum());
    }
}
