use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::fetcher::{self, Fetcher};
use crate::itemset::ItemSet;
use crate::models::{Data, FeedFormat, FeedRecord};
use crate::reconcile;

pub fn list_feeds(data: &Data) {
    if data.feeds.is_empty() {
        println!("No feeds");
        return;
    }

    for (i, feed) in data.feeds.iter().enumerate() {
        println!(
            "{}\t{}\t{}\t{} unread\tlast checked at {}",
            i,
            feed.url,
            feed.format,
            feed.unread_items.count(),
            feed.last_checked_at.format("%a %b %e %H:%M:%S %Z %Y"),
        );
    }
}

pub fn subscribe(data: &mut Data, url: &str) {
    data.feeds.push(FeedRecord::new(url.to_string()));
    data.dirty = true;
    println!("Subscribed to {url}");
}

pub fn unsubscribe(data: &mut Data, index: &str) -> Result<()> {
    let i = parse_index(index, data.feeds.len())?;
    let feed = data.feeds.remove(i);
    data.dirty = true;
    println!("Unsubscribed from {}", feed.url);
    Ok(())
}

/// Polls every due feed sequentially and reconciles its read/unread
/// state. A failing feed is reported and skipped; the loop continues.
pub async fn check(data: &mut Data, fetcher: &Fetcher, force: bool) {
    if data.feeds.is_empty() {
        println!("No feeds");
        return;
    }

    let now = Utc::now();
    let mut dirty = false;

    for feed in &mut data.feeds {
        if !force && !reconcile::is_due(feed.last_checked_at, now) {
            let age = now.signed_duration_since(feed.last_checked_at).num_minutes();
            println!("Skipping {} (checked {} minutes ago)", feed.url, age);
            continue;
        }

        println!("Checking: {}", feed.url);
        match check_feed(feed, fetcher, now).await {
            Ok(()) => dirty = true,
            Err(err) => {
                warn!(feed = %feed.url, error = %err, "check failed");
                eprintln!("  ✗ Failed: {err:#}");
            }
        }
    }

    if dirty {
        data.dirty = true;
    }
}

/// One feed's check attempt. The record is only touched after the
/// whole fetch+decode+reconcile sequence succeeded, so a failure never
/// corrupts previously-good state.
async fn check_feed(
    feed: &mut FeedRecord,
    fetcher: &Fetcher,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let bytes = fetcher.fetch_bytes(&feed.url).await?;

    let (all_items, format) = match feed.format {
        FeedFormat::Unknown => fetcher::probe(&bytes)?,
        pinned => (fetcher::decode(&bytes, pinned)?, pinned),
    };

    let outcome = reconcile::reconcile(&feed.read_items, &feed.unread_items, &all_items);

    feed.format = format;
    feed.read_items = outcome.read;
    feed.unread_items = outcome.unread;
    feed.last_checked_at = now;

    println!(
        "  {} unread items, {} new",
        feed.unread_items.count(),
        outcome.new_items
    );
    Ok(())
}

/// Pops the earliest unread item of the addressed feed (or, without an
/// index, of the first feed that has one) into the read set and prints
/// its link. Nothing unread anywhere is not an error.
pub fn next_item(data: &mut Data, index: Option<&str>) -> Result<()> {
    let target = match index {
        Some(raw) => {
            let i = parse_index(raw, data.feeds.len())?;
            (!data.feeds[i].unread_items.is_empty()).then_some(i)
        }
        None => data
            .feeds
            .iter()
            .position(|feed| !feed.unread_items.is_empty()),
    };

    let Some(i) = target else {
        println!("no unread items");
        return Ok(());
    };

    let feed = &mut data.feeds[i];
    if let Some(item) = feed.unread_items.earliest().cloned() {
        feed.unread_items.remove(&item);
        println!("{}", item.link);
        feed.read_items.add(item);
        data.dirty = true;
    }
    Ok(())
}

/// Marks every unread item of the feed as read.
pub fn mark_read(data: &mut Data, index: &str) -> Result<()> {
    let i = parse_index(index, data.feeds.len())?;
    let feed = &mut data.feeds[i];

    let moved = feed.unread_items.count();
    feed.read_items = feed.read_items.union(&feed.unread_items);
    feed.unread_items = ItemSet::new();
    if moved > 0 {
        data.dirty = true;
    }
    println!("Marked {moved} items read");
    Ok(())
}

/// Moves the most recently published read item back to unread.
pub fn mark_unread(data: &mut Data, index: &str) -> Result<()> {
    let i = parse_index(index, data.feeds.len())?;
    let feed = &mut data.feeds[i];

    let Some(item) = feed.read_items.latest().cloned() else {
        return Err(AppError::validation(format!("feed {i} has no read items")));
    };
    feed.read_items.remove(&item);
    println!("{} is unread again", item.link);
    feed.unread_items.add(item);
    data.dirty = true;
    Ok(())
}

fn parse_index(raw: &str, len: usize) -> Result<usize> {
    let index: usize = raw
        .parse()
        .map_err(|_| AppError::validation(format!("feed index must be an integer, got {raw:?}")))?;
    if index >= len {
        return Err(AppError::validation(format!(
            "feed index {index} out of range ({len} feeds)"
        )));
    }
    Ok(index)
}
