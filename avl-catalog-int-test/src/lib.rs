//! Shared fixtures for the catalog integration tests.

pub mod test_util;
