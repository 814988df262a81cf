//! DAO Pulse - AI-curated governance update feed
//!
//! This crate fetches DAO governance proposals, analyzes each proposal's
//! impact with a language model, and assembles the results into a ranked
//! feed of updates.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
