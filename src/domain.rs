//! Domain module - harvested records and the services that shape them
//!
//! Each module is its own file in the domain/ directory; commonly used
//! items are re-exported here.

pub mod constants;
pub mod records;
pub mod services;

pub use records::{DetailRecord, FieldMap, ListingEntry, MergedRecord};
pub use services::{Normalize, merge, normalize_fields};
