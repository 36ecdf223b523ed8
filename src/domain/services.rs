//! Domain services
//!
//! Record transformations that don't belong to a single entity.

pub mod merger;
pub mod normalizer;

pub use merger::merge;
pub use normalizer::{Normalize, collapse_whitespace, normalize_fields};
