//! HTTP request handlers

use super::state::AppState;
use crate::error::ResearchError;
use crate::research::{ResearchContext, RunBudget};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Body of `POST /research`
///
/// Budget fields can only narrow the configured limits.
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub question: String,
    pub max_depth: Option<u32>,
    pub max_queries_total: Option<usize>,
    pub max_sources_per_query: Option<usize>,
    pub max_total_sources: Option<usize>,
}

impl ResearchRequest {
    fn budget(&self, configured: &RunBudget) -> RunBudget {
        let narrow = |requested: Option<usize>, limit: usize| requested.map_or(limit, |r| r.min(limit));
        RunBudget {
            max_depth: self
                .max_depth
                .map_or(configured.max_depth, |d| d.min(configured.max_depth)),
            max_queries_total: narrow(self.max_queries_total, configured.max_queries_total),
            max_sources_per_query: narrow(
                self.max_sources_per_query,
                configured.max_sources_per_query,
            ),
            max_total_sources: narrow(self.max_total_sources, configured.max_total_sources),
            ..configured.clone()
        }
    }
}

/// Error body; carries whatever context was gathered before the failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ResearchContext>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            context: None,
        }
    }
}

/// Research handler
pub async fn research(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> Response {
    let question = request.question.trim();
    if question.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("question must not be empty")),
        )
            .into_response();
    }

    let budget = request.budget(state.researcher.budget());
    let researcher = state.researcher.as_ref().clone().with_budget(budget);
    info!("Research request: {}", question);

    match researcher.run(question, state.shutdown.child_token()).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!("Research failed: {}", err);
            let status = match &err {
                ResearchError::SynthesisFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                ResearchError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            };
            let body = ErrorResponse {
                error: err.to_string(),
                context: Some(err.context().clone()),
            };
            (status, Json(body)).into_response()
        }
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
