use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A catalog record: an ordered key with its category label and byte size.
///
/// `Entry` is the satellite data carried by every tree node and the value
/// handed back by lookups. Keys compare bytewise (`Ord for str`).
///
/// # Examples
///
/// ```rust
/// use avl_catalog::common::Entry;
///
/// let entry = Entry::new("cat_001.jpg", "Cat", 48_213);
/// assert_eq!(entry.key(), "cat_001.jpg");
/// assert_eq!(entry.to_string(), "cat_001.jpg [Cat, 48213 bytes]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    key: String,
    label: String,
    size: u64,
}

impl Entry {
    pub fn new(key: impl Into<String>, label: impl Into<String>, size: u64) -> Self {
        Entry {
            key: key.into(),
            label: label.into(),
            size,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` when `min_inclusive <= size < max_exclusive`.
    #[inline]
    pub fn size_in(&self, min_inclusive: u64, max_exclusive: u64) -> bool {
        min_inclusive <= self.size && self.size < max_exclusive
    }

    /// Replaces label and size, returning the previous values as an entry.
    pub(crate) fn replace_satellite(&mut self, label: String, size: u64) -> Entry {
        let old_label = std::mem::replace(&mut self.label, label);
        let old_size = std::mem::replace(&mut self.size, size);
        Entry {
            key: self.key.clone(),
            label: old_label,
            size: old_size,
        }
    }

    pub fn into_parts(self) -> (String, String, u64) {
        (self.key, self.label, self.size)
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {} bytes]", self.key, self.label, self.size)
    }
}
