//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamp, validation errors)
//! - `governance` - Organization and proposal records from the data provider
//! - `updates` - Impact analysis, feed updates, parsing and ranking

pub mod foundation;
pub mod governance;
pub mod updates;
