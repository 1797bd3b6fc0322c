use async_trait::async_trait;
use na_core::types::PLACEHOLDER_IMAGE;
use na_core::{infer_category, Article, Category, Error, NewsConfig, PrimarySource, Result, Source};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::logging::Logger;

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
}

/// Top headlines from NewsAPI.
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: Client,
    config: NewsConfig,
    logger: Logger,
}

impl NewsApiSource {
    pub fn new(client: Client, config: NewsConfig) -> Self {
        Self {
            client,
            config,
            logger: Logger::new().with_prefix("newsapi"),
        }
    }

    /// Fetch and normalize one batch. A 429 comes back as
    /// [`Error::RateLimited`]; other non-success statuses as
    /// [`Error::UpstreamStatus`].
    pub async fn try_fetch(&self, category: Option<&Category>, query: &str) -> Result<Vec<Article>> {
        let api_key = self
            .config
            .newsapi_key
            .as_deref()
            .ok_or_else(|| Error::Config("no NewsAPI key configured".to_string()))?;

        let mut params = vec![
            ("country", self.config.country.clone()),
            ("apiKey", api_key.to_string()),
            ("pageSize", self.config.upstream_page_size.to_string()),
        ];
        if let Some(category) = category {
            params.push(("category", category.as_str().to_string()));
        }
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }

        let response = self
            .client
            .get(&self.config.newsapi_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let envelope: NewsApiResponse = serde_json::from_slice(&body)?;
        let Some(raw) = envelope.articles else {
            self.logger.warn("⚠️ response missing 'articles'");
            return Ok(Vec::new());
        };

        self.logger.info(&format!(
            "✅ Fetched {} articles (category: {})",
            raw.len(),
            category.map_or("inferred", Category::as_str)
        ));

        let total = raw.len();
        let articles = normalize(raw, category);
        if articles.len() < total {
            self.logger.debug(&format!(
                "Dropped {} articles missing a title or url",
                total - articles.len()
            ));
        }
        Ok(articles)
    }
}

fn normalize(raw: Vec<RawArticle>, category: Option<&Category>) -> Vec<Article> {
    raw.into_iter()
        .filter_map(|item| {
            let title = item.title.filter(|t| !t.is_empty())?;
            let url = item.url.filter(|u| !u.is_empty())?;
            let image = item
                .url_to_image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
            let category = category
                .cloned()
                .unwrap_or_else(|| infer_category(&title));
            Some(Article {
                title,
                url,
                image,
                source: Source::NewsApi,
                category,
            })
        })
        .collect()
}

#[async_trait]
impl PrimarySource for NewsApiSource {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_primary(&self, category: Option<&Category>, query: &str) -> Vec<Article> {
        match self.try_fetch(category, query).await {
            Ok(articles) => articles,
            Err(Error::RateLimited) => {
                self.logger
                    .warn("⚠️ Rate limit reached (429), switching to RSS fallback");
                Vec::new()
            }
            Err(e @ Error::Config(_)) => {
                self.logger.warn(&format!("⚠️ Skipping: {}", e));
                Vec::new()
            }
            Err(e) => {
                self.logger.error(&format!("❌ Fetch error: {}", e));
                Vec::new()
            }
        }
    }
}
