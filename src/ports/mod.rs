//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Text-generation service
//! - `GovernanceDataProvider` - DAO organization and proposal source
//! - `ImpactAnalyzer` - Proposal text to `ImpactAnalysis`

mod ai_provider;
mod governance_provider;
mod impact_analyzer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage,
};
pub use governance_provider::{GovernanceDataProvider, GovernanceError};
pub use impact_analyzer::ImpactAnalyzer;
