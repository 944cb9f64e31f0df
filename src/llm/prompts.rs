//! Prompt templates for per-source analysis and final synthesis

/// Shown in place of prior findings when the context is still empty
pub const NO_CONTEXT_MARKER: &str = "No prior research context available for this analysis.";

/// Prompt asking the model to summarize one source and propose follow-ups
pub fn analysis_prompt(
    query: &str,
    content: &str,
    source_url: &str,
    prior_context: Option<&str>,
    max_queries: usize,
) -> String {
    let context_section = match prior_context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Research findings gathered so far:\n---\n{}\n---",
            context
        ),
        None => NO_CONTEXT_MARKER.to_string(),
    };

    format!(
        r#"{context_section}

You are a research assistant working on the query: "{query}".
The following content was retrieved from {source_url}:
--- BEGIN CONTENT ---
{content}
--- END CONTENT ---

Using only the content above from {source_url}, together with the query and any prior findings:
1. Write a concise, self-contained summary (at most 150 words) of what this content says that is relevant to "{query}".
2. Propose up to {max_queries} new, specific search queries that would deepen or clarify the research on "{query}". Each must be a usable search phrase.

Reply with a JSON object only, with the keys "summary" (a string) and "queries" (a list of strings).
Example:
{{
  "summary": "The page explains X and how it relates to Y, noting A and B.",
  "queries": ["how X affects Y", "history of A", "B compared to X"]
}}
"#
    )
}

/// Prompt asking the model to answer the question from accumulated findings
pub fn synthesis_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are a research synthesizer.
Answer the research question below using a collection of summaries taken from different sources.

Research question: "{question}"

Collected summaries:
---
{context}
---

Using only the collected summaries above, write a complete and coherent answer to "{question}".
Organize the answer clearly and point out significant disagreements between sources. Do not add knowledge that is not in the summaries.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_without_context() {
        let prompt = analysis_prompt("What is photosynthesis?", "Plants use light.", "https://a.com", None, 3);
        assert!(prompt.starts_with(NO_CONTEXT_MARKER));
        assert!(prompt.contains("https://a.com"));
        assert!(prompt.contains("--- BEGIN CONTENT ---\nPlants use light.\n--- END CONTENT ---"));
        assert!(prompt.contains("up to 3 new"));
        assert!(prompt.contains(r#""queries": ["#));
    }

    #[test]
    fn test_analysis_prompt_with_context() {
        let prompt = analysis_prompt("q", "c", "u", Some("Earlier finding."), 3);
        assert!(!prompt.contains(NO_CONTEXT_MARKER));
        assert!(prompt.contains("---\nEarlier finding.\n---"));

        let blank = analysis_prompt("q", "c", "u", Some("  "), 3);
        assert!(blank.contains(NO_CONTEXT_MARKER));
    }

    #[test]
    fn test_synthesis_prompt() {
        let prompt = synthesis_prompt("Why is the sky blue?", "Rayleigh scattering.");
        assert!(prompt.contains(r#""Why is the sky blue?""#));
        assert!(prompt.contains("---\nRayleigh scattering.\n---"));
        assert!(prompt.contains("Using only the collected summaries"));
    }
}
