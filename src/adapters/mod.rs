//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text-generation providers (OpenAI, mock)
//! - `impact` - LLM-backed impact analyzer
//! - `tally` - Governance data providers (Tally GraphQL, in-memory)
//! - `http` - REST endpoints for update feeds

pub mod ai;
pub mod http;
pub mod impact;
pub mod tally;
