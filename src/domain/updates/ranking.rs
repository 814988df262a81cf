//! Feed ordering.

use super::update::{DaoUpdate, UpdatePriority};

/// Stable-sorts items so urgent come first, then important, then fyi.
///
/// Items of equal priority keep their relative order.
pub fn sort_by_priority<T, F>(items: &mut [T], priority_of: F)
where
    F: Fn(&T) -> UpdatePriority,
{
    items.sort_by_key(|item| priority_of(item).rank());
}

/// Orders a feed of updates by priority.
pub fn rank_updates(mut updates: Vec<DaoUpdate>) -> Vec<DaoUpdate> {
    sort_by_priority(&mut updates, DaoUpdate::priority);
    updates
}
