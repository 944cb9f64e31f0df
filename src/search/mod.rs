//! Web search module
//!
//! The search provider capability and its engine-backed implementation.

mod executor;
mod traits;

pub use executor::MetaSearch;
pub use traits::SearchProvider;
