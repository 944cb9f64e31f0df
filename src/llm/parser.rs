//! Decoding of the structured analysis reply
//!
//! Models wrap JSON in code fences, add chatter around it, or get field
//! types wrong. Decoding runs in two stages: a typed decode, then a salvage
//! pass over the generic JSON value. Nothing here returns an error.

use serde::Deserialize;
use serde_json::Value;

/// Summary and follow-up queries for one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub queries: Vec<String>,
}

/// How an analysis reply was decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The reply matched the expected shape
    Strict(Analysis),
    /// The reply was JSON but some fields had to be recovered or defaulted
    Salvaged(Analysis),
    /// Nothing usable
    Failed,
}

impl ParseOutcome {
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Strict(a) | Self::Salvaged(a) => Some(a),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Summary and queries, empty for a failed parse
    pub fn into_parts(self) -> (String, Vec<String>) {
        match self {
            Self::Strict(a) | Self::Salvaged(a) => (a.summary, a.queries),
            Self::Failed => (String::new(), Vec::new()),
        }
    }
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // optional language tag on the opening line
    let body = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest.trim_start_matches("json"),
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Decode an analysis reply
pub fn parse_analysis(text: &str) -> ParseOutcome {
    let body = strip_fences(text);
    if body.is_empty() {
        return ParseOutcome::Failed;
    }

    let outcome = decode(body);
    if !outcome.is_failed() {
        return outcome;
    }

    // chatter around the object: retry on the outermost brace span
    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end && (start > 0 || end + 1 < body.len()) => {
            decode(&body[start..=end])
        }
        _ => ParseOutcome::Failed,
    }
}

fn decode(body: &str) -> ParseOutcome {
    if let Ok(analysis) = serde_json::from_str::<Analysis>(body) {
        return ParseOutcome::Strict(analysis);
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let summary = map
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let queries = map
                .get("queries")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ParseOutcome::Salvaged(Analysis { summary, queries })
        }
        _ => ParseOutcome::Failed,
    }
}
