//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for tests and dry runs
//! - `OpenAIProvider` - OpenAI chat completion models

mod mock_provider;
mod openai_provider;

pub use mock_provider::{
    MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_RESPONSE, MOCK_MODEL,
};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
