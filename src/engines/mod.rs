//! Search engine module
//!
//! Defines the Engine trait and the concrete web-search backends.

mod loader;
mod registry;
mod traits;

pub mod brave;
pub mod duckduckgo;
pub mod google;
pub mod wikipedia;

pub use loader::EngineLoader;
pub use registry::EngineRegistry;
pub use traits::*;
