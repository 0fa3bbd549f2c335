use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::itemset::ItemSet;

/// One normalized feed entry, produced uniformly from RSS or Atom input.
/// Identity is `guid` alone; the other fields are display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub published_at: DateTime<Utc>,
}

/// Wire format of a subscription. Starts `Unknown` and is pinned to
/// `Rss` or `Atom` by the first successful decode; never re-probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Unknown,
    Rss,
    Atom,
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedFormat::Unknown => write!(f, "unknown"),
            FeedFormat::Rss => write!(f, "rss"),
            FeedFormat::Atom => write!(f, "atom"),
        }
    }
}

/// Persisted per-subscription state. `read_items` and `unread_items`
/// are guid-disjoint between operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRecord {
    pub url: String,
    pub format: FeedFormat,
    pub last_checked_at: DateTime<Utc>,
    pub read_items: ItemSet,
    pub unread_items: ItemSet,
}

impl FeedRecord {
    /// A fresh subscription: format unknown, both sets empty, last
    /// checked at the epoch so the first check is never skipped by the
    /// freshness guard.
    pub fn new(url: String) -> Self {
        Self {
            url,
            format: FeedFormat::Unknown,
            last_checked_at: DateTime::UNIX_EPOCH,
            read_items: ItemSet::new(),
            unread_items: ItemSet::new(),
        }
    }
}

/// The whole persisted collection. Feed order is insertion order; the
/// CLI addresses records by position.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Data {
    pub feeds: Vec<FeedRecord>,
    #[serde(skip)]
    pub dirty: bool,
}
