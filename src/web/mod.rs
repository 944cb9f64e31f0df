//! HTTP surface
//!
//! `POST /research` runs one research and returns its report;
//! `GET /health` reports liveness.

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, ResearchRequest};
pub use routes::create_router;
pub use state::AppState;
