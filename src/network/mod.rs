//! HTTP networking module
//!
//! Provides the HTTP client every external provider talks through.

mod client;
mod request;
mod user_agent;

pub use client::HttpClient;
pub use request::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use user_agent::{accept_html, generate_user_agent, FETCH_USER_AGENT};
