use chrono::{DateTime, Duration, Utc};

use crate::itemset::ItemSet;

/// Minimum age of a feed's last check before it is polled again,
/// unless the caller forces the check.
pub const CHECK_INTERVAL_MINUTES: i64 = 60;

/// Result of merging one fetched snapshot into stored read/unread
/// state. `new_items` is signed: the unread count can in principle
/// shrink between fetches, and the arithmetic must not assume
/// otherwise.
#[derive(Debug)]
pub struct Reconciliation {
    pub read: ItemSet,
    pub unread: ItemSet,
    pub new_items: i64,
}

/// Computes the next read/unread partition from the previous one and a
/// freshly fetched snapshot.
///
/// Read items that scrolled out of the feed's visible window are
/// forgotten; if they ever reappear they count as new. Unread items
/// are retained even when the fetched snapshot no longer carries them,
/// so a shrinking feed never silently drops something unseen. The two
/// result sets are guid-disjoint by construction.
pub fn reconcile(old_read: &ItemSet, old_unread: &ItemSet, all_items: &ItemSet) -> Reconciliation {
    let read = all_items.intersection(old_read);
    let unread = old_unread.union(&all_items.without(&read));
    let new_items = unread.count() as i64 - old_unread.count() as i64;
    Reconciliation {
        read,
        unread,
        new_items,
    }
}

/// Freshness guard: true when the feed was last checked at least
/// `CHECK_INTERVAL_MINUTES` ago.
pub fn is_due(last_checked_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(last_checked_at) >= Duration::minutes(CHECK_INTERVAL_MINUTES)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
