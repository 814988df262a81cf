//! Application handlers.
//!
//! Query handlers that orchestrate domain operations.

pub mod updates;

pub use updates::{
    FeedError, GetDaoUpdatesHandler, GetDaoUpdatesQuery, GetDaoUpdatesResult, UserHoldings,
};
