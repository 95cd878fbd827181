//! Types and helpers shared across the catalog.

mod constants;
mod entry;
mod type_utils;

pub use constants::*;
pub use entry::*;
pub use type_utils::*;
