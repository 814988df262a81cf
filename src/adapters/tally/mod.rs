//! Governance data provider adapters.
//!
//! - `TallyClient` - Tally GraphQL API
//! - `InMemoryGovernanceProvider` - Canned responses for tests and dry runs

mod in_memory;
mod tally_client;

pub use in_memory::{GovernanceCall, InMemoryGovernanceProvider, InjectedFailure};
pub use tally_client::{TallyClient, TallyConfig};
