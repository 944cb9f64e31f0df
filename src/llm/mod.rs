//! Language model access: provider, prompts and reply parsing

mod openai;
mod parser;
mod prompts;
mod traits;

pub use openai::OpenAiProvider;
pub use parser::{parse_analysis, strip_fences, Analysis, ParseOutcome};
pub use prompts::{analysis_prompt, synthesis_prompt, NO_CONTEXT_MARKER};
pub use traits::LlmProvider;
