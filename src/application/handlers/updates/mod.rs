//! Update feed query handlers.

mod get_dao_updates;

pub use get_dao_updates::{
    FeedError, GetDaoUpdatesHandler, GetDaoUpdatesQuery, GetDaoUpdatesResult, UserHoldings,
};
