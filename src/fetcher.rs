use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::itemset::ItemSet;
use crate::models::{FeedFormat, Item};

/// HTTP side of a feed check. Fetching and decoding are split so the
/// format probe can run both decoders against a single response body.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("feedkeep/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("failed to fetch {}: {}", url, response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {url}"))?;
        Ok(bytes.to_vec())
    }
}

/// Decodes a body under an already-pinned format. There is no fallback
/// to the other decoder here; format pinning is permanent.
pub fn decode(bytes: &[u8], format: FeedFormat) -> Result<ItemSet> {
    match format {
        FeedFormat::Rss => decode_rss(bytes),
        FeedFormat::Atom => decode_atom(bytes),
        FeedFormat::Unknown => Err(anyhow!("feed format not yet resolved")),
    }
}

/// Probes an undetermined body: RSS first, then Atom. Returns the
/// decoded items together with the format to pin.
pub fn probe(bytes: &[u8]) -> Result<(ItemSet, FeedFormat)> {
    match decode_rss(bytes) {
        Ok(items) => Ok((items, FeedFormat::Rss)),
        Err(rss_err) => match decode_atom(bytes) {
            Ok(items) => Ok((items, FeedFormat::Atom)),
            Err(atom_err) => Err(anyhow!(
                "body is neither rss ({rss_err:#}) nor atom ({atom_err:#})"
            )),
        },
    }
}

fn decode_rss(bytes: &[u8]) -> Result<ItemSet> {
    let channel = rss::Channel::read_from(bytes).context("rss decode failed")?;

    let mut items = ItemSet::new();
    for item in channel.items() {
        let link = item.link().unwrap_or_default().to_owned();
        // RSS items may omit <guid>; the link stands in as identity then.
        let guid = item
            .guid()
            .map(|guid| guid.value().to_owned())
            .filter(|guid| !guid.is_empty())
            .or_else(|| (!link.is_empty()).then(|| link.clone()))
            .ok_or_else(|| anyhow!("item has neither guid nor link"))?;

        let pub_date = item
            .pub_date()
            .ok_or_else(|| anyhow!("item {guid} has no pubDate"))?;
        let published_at = DateTime::parse_from_rfc2822(pub_date)
            .with_context(|| format!("item {guid} has a malformed pubDate"))?
            .with_timezone(&Utc);

        items.add(Item {
            title: item.title().unwrap_or_default().to_owned(),
            link,
            guid,
            published_at,
        });
    }
    Ok(items)
}

fn decode_atom(bytes: &[u8]) -> Result<ItemSet> {
    let feed = atom_syndication::Feed::read_from(bytes).context("atom decode failed")?;

    let mut items = ItemSet::new();
    for entry in feed.entries() {
        let guid = entry.id().to_owned();
        let published_at = entry
            .published()
            .ok_or_else(|| anyhow!("entry {guid} has no published date"))?
            .with_timezone(&Utc);
        let link = entry
            .links()
            .first()
            .map(|link| link.href().to_owned())
            .unwrap_or_default();

        items.add(Item {
            title: entry.title().value.clone(),
            link,
            guid,
            published_at,
        });
    }
    Ok(items)
}
