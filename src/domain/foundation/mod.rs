//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects and error types shared by the
//! governance and updates modules.

mod errors;
mod timestamp;

pub use errors::ValidationError;
pub use timestamp::Timestamp;
