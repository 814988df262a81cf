//! Governance module - Raw records consumed from the data provider.
//!
//! These types mirror the subset of the provider's GraphQL responses that the
//! update pipeline reads. They are owned by the provider, not by this crate,
//! so decoding is lenient: unknown fields are ignored and optional fields
//! default.

mod records;

pub use records::{
    decode_organization, decode_proposals, Organization, Proposal, ProposalMetadata,
    UNKNOWN_PROPOSAL_TITLE,
};
