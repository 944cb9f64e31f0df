//! Iterative research: data model, per-source pipeline and the loop that
//! drives them

mod models;
mod orchestrator;
mod processor;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use models::*;
pub use orchestrator::Researcher;
pub use processor::SourceProcessor;
pub use state::RunState;
