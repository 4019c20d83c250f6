use feed_rs::model::Link;
use feed_rs::parser;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION};

use crate::config::FeedConfig;
use crate::domain::{FeedEntry, FetchOutcome};
use crate::errors::{PushError, PushResult};
use crate::sources::traits::FeedSource;

/// Fetches a single RSS/Atom feed over HTTP.
pub struct HttpFeedSource {
    client: Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(config: &FeedConfig) -> PushResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_entries(&self) -> PushResult<Vec<FeedEntry>> {
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes()?;
        Self::parse_entries(&bytes)
    }

    /// Parse raw feed bytes into entries, keeping the feed's own order.
    pub fn parse_entries(bytes: &[u8]) -> PushResult<Vec<FeedEntry>> {
        let parsed = parser::parse(bytes).map_err(|e| PushError::FeedParse(e.to_string()))?;

        let entries = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry_link(&entry.links).unwrap_or(entry.id);

                let (title, title_is_html) = entry
                    .title
                    .map(|t| {
                        let is_html = matches!(
                            t.content_type.essence().to_string().as_str(),
                            "text/html" | "application/xhtml+xml"
                        );
                        (t.content, is_html)
                    })
                    .unwrap_or_default();

                FeedEntry::new(link, title)
                    .with_html_title(title_is_html)
                    .with_published(entry.published.map(|dt| dt.to_rfc3339()))
                    .with_updated(entry.updated.map(|dt| dt.to_rfc3339()))
                    .with_content(entry.content.and_then(|c| c.body))
            })
            .collect();

        Ok(entries)
    }
}

/// The entry's page link: the first `alternate` (or untyped) link, else the first link of any kind.
fn entry_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> FetchOutcome {
        match self.fetch_entries() {
            Ok(entries) => {
                let outcome = FetchOutcome::from_entries(entries);
                match &outcome {
                    FetchOutcome::Entries { entries, newest } => {
                        tracing::info!(count = entries.len(), newest = %newest, "Fetched feed entries");
                    }
                    FetchOutcome::NoData { reason } => {
                        tracing::warn!(url = %self.url, "No entries fetched: {}", reason);
                    }
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Feed fetch failed");
                FetchOutcome::NoData {
                    reason: e.to_string(),
                }
            }
        }
    }
}
