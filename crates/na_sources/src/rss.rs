use async_trait::async_trait;
use feed_rs::model::Entry;
use feed_rs::parser;
use futures::future::join_all;
use na_core::types::{NO_TITLE, PLACEHOLDER_IMAGE};
use na_core::{infer_category, Article, Category, Error, FallbackSource, Result, Source};
use reqwest::Client;

use crate::logging::Logger;

/// Feeds consulted when the primary source is empty, in the order their
/// entries are reported.
const DEFAULT_FEEDS: [(&str, Category); 9] = [
    ("https://rss.cnn.com/rss/edition.rss", Category::General),
    ("https://feeds.bbci.co.uk/news/rss.xml", Category::General),
    ("https://www.aljazeera.com/xml/rss/all.xml", Category::General),
    ("https://www.espn.com/espn/rss/news", Category::Sports),
    ("https://www.theverge.com/rss/index.xml", Category::Technology),
    ("https://www.etonline.com/news/rss", Category::Entertainment),
    ("https://www.medicalnewstoday.com/rss", Category::Health),
    (
        "https://www.reutersagency.com/feed/?best-sectors=business-finance&post_type=best",
        Category::Business,
    ),
    ("https://www.sciencedaily.com/rss/all.xml", Category::Science),
];

/// A syndication feed and the category its entries are filed under.
/// [`Category::General`] feeds get per-entry classification instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub url: String,
    pub category: Category,
}

impl Feed {
    pub fn new(url: impl Into<String>, category: Category) -> Self {
        Self {
            url: url.into(),
            category,
        }
    }
}

pub fn default_feeds() -> Vec<Feed> {
    DEFAULT_FEEDS
        .into_iter()
        .map(|(url, category)| Feed::new(url, category))
        .collect()
}

#[derive(Debug, Clone)]
pub struct RssSource {
    client: Client,
    feeds: Vec<Feed>,
    logger: Logger,
}

impl RssSource {
    pub fn new(client: Client) -> Self {
        Self::with_feeds(client, default_feeds())
    }

    pub fn with_feeds(client: Client, feeds: Vec<Feed>) -> Self {
        Self {
            client,
            feeds,
            logger: Logger::new().with_prefix("rss"),
        }
    }

    pub async fn fetch_feed(&self, feed: &Feed) -> Result<Vec<Article>> {
        let response = self.client.get(&feed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        parse_feed(&body, &feed.category)
    }

    /// Every feed is fetched independently; a failing feed contributes
    /// nothing. Results keep feed-table order.
    pub async fn fetch_all(&self) -> Vec<Article> {
        let batches = join_all(self.feeds.iter().map(|feed| async move {
            match self.fetch_feed(feed).await {
                Ok(articles) => {
                    self.logger
                        .info(&format!("Fetched {} articles from {}", articles.len(), feed.url));
                    articles
                }
                Err(e) => {
                    self.logger.warn(&format!("Skipping {}: {}", feed.url, e));
                    Vec::new()
                }
            }
        }))
        .await;

        batches.into_iter().flatten().collect()
    }
}

#[async_trait]
impl FallbackSource for RssSource {
    fn name(&self) -> &str {
        "rss"
    }

    async fn fetch_fallback(&self) -> Vec<Article> {
        self.fetch_all().await
    }
}

/// Parse an RSS/Atom document into articles filed under `category`.
pub fn parse_feed(body: &[u8], category: &Category) -> Result<Vec<Article>> {
    let feed = parser::parse(body).map_err(|e| Error::Feed(e.to_string()))?;
    Ok(feed
        .entries
        .iter()
        .map(|entry| entry_to_article(entry, category))
        .collect())
}

fn entry_to_article(entry: &Entry, feed_category: &Category) -> Article {
    let title = entry_title(entry.title.as_ref().map(|t| t.content.clone()));

    let category = match feed_category {
        Category::General => infer_category(&title),
        other => other.clone(),
    };

    Article {
        url: select_link(entry),
        image: select_image(entry),
        title,
        source: Source::Rss,
        category,
    }
}

/// Titles pass through as published; only a missing or empty one is replaced.
fn entry_title(raw: Option<String>) -> String {
    raw.filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn select_link(entry: &Entry) -> String {
    entry
        .links
        .iter()
        .find(|l| {
            l.rel
                .as_deref()
                .map_or(true, |rel| rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default()
}

fn is_image_type(media_type: Option<String>) -> bool {
    media_type.map_or(true, |t| t.starts_with("image/"))
}

/// Media content, then thumbnails, then an image enclosure link.
fn select_image(entry: &Entry) -> String {
    let content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| is_image_type(c.content_type.as_ref().map(|m| m.to_string())))
        .filter_map(|c| c.url.as_ref().map(|u| u.to_string()))
        .find(|u| !u.trim().is_empty());

    let thumbnail = || {
        entry
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|t| t.image.uri.trim())
            .find(|u| !u.is_empty())
            .map(str::to_string)
    };

    let enclosure = || {
        entry
            .links
            .iter()
            .filter(|l| {
                l.rel
                    .as_deref()
                    .is_some_and(|rel| rel.eq_ignore_ascii_case("enclosure"))
            })
            .filter(|l| is_image_type(l.media_type.clone()))
            .map(|l| l.href.trim())
            .find(|href| !href.is_empty())
            .map(str::to_string)
    };

    content
        .or_else(thumbnail)
        .or_else(enclosure)
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}
