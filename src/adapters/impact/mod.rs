//! Impact analyzer adapters.

mod llm_analyzer;

pub use llm_analyzer::{LlmImpactAnalyzer, EMPTY_RESPONSE_TEXT, GENERATION_FAILED_TEXT};
