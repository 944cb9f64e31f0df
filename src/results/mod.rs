//! Result handling module
//!
//! Search hit types, URL normalization and cross-engine aggregation.

mod container;
mod normalize;
mod types;

pub use container::ResultContainer;
pub use normalize::normalize_url;
pub use types::*;
