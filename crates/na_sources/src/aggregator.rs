use std::sync::Arc;

use na_core::{
    Article, Category, FallbackSource, NewsConfig, NewsPage, NewsRequest, PrimarySource, Result,
};
use tracing::{debug, info, warn};

use crate::client::build_client;
use crate::newsapi::NewsApiSource;
use crate::rss::RssSource;

/// Runs the primary → fallback → placeholder chain, then filters and pages.
pub struct NewsAggregator {
    primary: Arc<dyn PrimarySource>,
    fallback: Arc<dyn FallbackSource>,
}

impl NewsAggregator {
    pub fn new(primary: Arc<dyn PrimarySource>, fallback: Arc<dyn FallbackSource>) -> Self {
        Self { primary, fallback }
    }

    /// NewsAPI backed by the default RSS feed table, sharing one client.
    pub fn from_config(config: &NewsConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(config.request_timeout)?;
        let primary = NewsApiSource::new(client.clone(), config.clone());
        let fallback = RssSource::new(client);
        Ok(Self::new(Arc::new(primary), Arc::new(fallback)))
    }

    pub async fn get_news(&self, request: &NewsRequest) -> NewsPage {
        // Unrecognized names still flow through as `Category::Other`.
        let category = (!request.category.is_empty()).then(|| Category::parse(&request.category));

        let mut articles = self.collect(category.as_ref(), &request.query).await;

        if let Some(category) = &category {
            articles.retain(|a| a.category.matches(category));
        }

        let (start, end) = request.window();
        let articles: Vec<Article> = articles.into_iter().skip(start).take(end - start).collect();
        debug!(
            "📄 Page {} (size {}) holds {} articles",
            request.page,
            request.page_size,
            articles.len()
        );
        NewsPage { articles }
    }

    async fn collect(&self, category: Option<&Category>, query: &str) -> Vec<Article> {
        let articles = self.primary.fetch_primary(category, query).await;
        if !articles.is_empty() {
            info!("📰 Using {} articles from {}", articles.len(), self.primary.name());
            return articles;
        }

        let articles = self.fallback.fetch_fallback().await;
        if !articles.is_empty() {
            info!("📡 Using {} articles from {}", articles.len(), self.fallback.name());
            return articles;
        }

        warn!("⚠️ Every source came back empty, serving a placeholder");
        vec![Article::placeholder(
            category.cloned().unwrap_or(Category::General),
        )]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use na_core::types::PLACEHOLDER_IMAGE;
    use na_core::Source;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct StaticPrimary {
        articles: Vec<Article>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrimarySource for StaticPrimary {
        fn name(&self) -> &str {
            "static-primary"
        }

        async fn fetch_primary(&self, _category: Option<&Category>, _query: &str) -> Vec<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.articles.clone()
        }
    }

    #[derive(Default)]
    struct StaticFallback {
        articles: Vec<Article>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FallbackSource for StaticFallback {
        fn name(&self) -> &str {
            "static-fallback"
        }

        async fn fetch_fallback(&self) -> Vec<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.articles.clone()
        }
    }

    fn article(n: usize, category: Category, source: Source) -> Article {
        Article {
            title: format!("Article {}", n),
            url: format!("https://news.example/{}", n),
            image: PLACEHOLDER_IMAGE.to_string(),
            source,
            category,
        }
    }

    fn numbered(count: usize) -> Vec<Article> {
        (0..count)
            .map(|n| article(n, Category::General, Source::NewsApi))
            .collect()
    }

    fn aggregator(
        primary: Vec<Article>,
        fallback: Vec<Article>,
    ) -> (NewsAggregator, Arc<StaticPrimary>, Arc<StaticFallback>) {
        let primary = Arc::new(StaticPrimary {
            articles: primary,
            ..Default::default()
        });
        let fallback = Arc::new(StaticFallback {
            articles: fallback,
            ..Default::default()
        });
        (
            NewsAggregator::new(primary.clone(), fallback.clone()),
            primary,
            fallback,
        )
    }

    #[tokio::test]
    async fn test_primary_results_skip_fallback() {
        let (aggregator, primary, fallback) = aggregator(numbered(3), numbered(5));

        let page = aggregator.get_news(&NewsRequest::default()).await;

        assert_eq!(page.articles.len(), 3);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_primary_uses_fallback() {
        let rss = vec![article(0, Category::Sports, Source::Rss)];
        let (aggregator, primary, fallback) = aggregator(vec![], rss.clone());

        let page = aggregator.get_news(&NewsRequest::default()).await;

        assert_eq!(page.articles, rss);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_empty_serves_placeholder() {
        let (aggregator, _, _) = aggregator(vec![], vec![]);

        let page = aggregator.get_news(&NewsRequest::new(1, 6)).await;

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "articles": [{
                    "title": "Dummy News",
                    "url": "https://example.com",
                    "image": "https://source.unsplash.com/random",
                    "category": "general"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_placeholder_takes_requested_category() {
        let (aggregator, _, _) = aggregator(vec![], vec![]);

        let page = aggregator
            .get_news(&NewsRequest::default().with_category("Sports"))
            .await;

        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].category, Category::Sports);
    }

    #[tokio::test]
    async fn test_placeholder_is_paged_like_anything_else() {
        let (aggregator, _, _) = aggregator(vec![], vec![]);

        let page = aggregator.get_news(&NewsRequest::new(2, 6)).await;

        assert!(page.articles.is_empty());
    }

    #[tokio::test]
    async fn test_category_filter_drops_other_categories() {
        let mixed = vec![
            article(0, Category::Sports, Source::Rss),
            article(1, Category::Business, Source::Rss),
            article(2, Category::Sports, Source::Rss),
            article(3, Category::General, Source::Rss),
        ];
        let (aggregator, _, _) = aggregator(vec![], mixed);

        let page = aggregator
            .get_news(&NewsRequest::default().with_category("sports"))
            .await;

        assert_eq!(page.articles.len(), 2);
        assert!(page.articles.iter().all(|a| a.category == Category::Sports));
        assert_eq!(page.articles[0].url, "https://news.example/0");
        assert_eq!(page.articles[1].url, "https://news.example/2");
    }

    #[tokio::test]
    async fn test_filter_can_empty_the_list() {
        let (aggregator, _, _) = aggregator(vec![], vec![article(0, Category::Health, Source::Rss)]);

        let page = aggregator
            .get_news(&NewsRequest::default().with_category("science"))
            .await;

        assert!(page.articles.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_still_serves_placeholder() {
        let (aggregator, primary, fallback) = aggregator(vec![], vec![]);

        let page = aggregator
            .get_news(&NewsRequest::default().with_category("politics"))
            .await;

        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].category, Category::Other("politics".to_string()));
        assert_eq!(
            serde_json::to_value(&page).unwrap()["articles"][0]["category"],
            "politics"
        );
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_filters_out_real_articles() {
        let (aggregator, primary, fallback) = aggregator(vec![], numbered(3));

        let page = aggregator
            .get_news(&NewsRequest::default().with_category("Politics"))
            .await;

        assert!(page.articles.is_empty());
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pagination_windows() {
        let (aggregator, _, _) = aggregator(numbered(10), vec![]);

        let urls = |page: NewsPage| -> Vec<String> {
            page.articles.into_iter().map(|a| a.url).collect()
        };

        let second = urls(aggregator.get_news(&NewsRequest::new(2, 4)).await);
        assert_eq!(
            second,
            (4..8).map(|n| format!("https://news.example/{}", n)).collect::<Vec<_>>()
        );

        let third = urls(aggregator.get_news(&NewsRequest::new(3, 4)).await);
        assert_eq!(
            third,
            (8..10).map(|n| format!("https://news.example/{}", n)).collect::<Vec<_>>()
        );

        let fourth = urls(aggregator.get_news(&NewsRequest::new(4, 4)).await);
        assert!(fourth.is_empty());
    }

    #[tokio::test]
    async fn test_query_reaches_primary_only() {
        struct QueryRecorder(std::sync::Mutex<Vec<(Option<Category>, String)>>);

        #[async_trait]
        impl PrimarySource for QueryRecorder {
            fn name(&self) -> &str {
                "recorder"
            }

            async fn fetch_primary(&self, category: Option<&Category>, query: &str) -> Vec<Article> {
                self.0.lock().unwrap().push((category.cloned(), query.to_string()));
                Vec::new()
            }
        }

        let recorder = Arc::new(QueryRecorder(Default::default()));
        let fallback = Arc::new(StaticFallback::default());
        let aggregator = NewsAggregator::new(recorder.clone(), fallback.clone());

        aggregator
            .get_news(&NewsRequest::default().with_category("TECHNOLOGY").with_query("rust"))
            .await;

        assert_eq!(
            recorder.0.lock().unwrap().as_slice(),
            &[(Some(Category::Technology), "rust".to_string())]
        );
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_primary_falls_back() {
        use axum::http::StatusCode;
        use axum::routing::get;
        use axum::Router;

        use crate::testing::serve;

        let router = Router::new().route(
            "/top-headlines",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let base = serve(router).await;
        let config = NewsConfig::default()
            .with_api_key("test-key")
            .with_newsapi_url(format!("{}/top-headlines", base));
        let primary = NewsApiSource::new(build_client(config.request_timeout).unwrap(), config);
        assert!(primary.fetch_primary(None, "").await.is_empty());

        let rss = vec![article(0, Category::Science, Source::Rss)];
        let fallback = Arc::new(StaticFallback {
            articles: rss.clone(),
            ..Default::default()
        });
        let aggregator = NewsAggregator::new(Arc::new(primary), fallback.clone());

        let page = aggregator.get_news(&NewsRequest::default()).await;

        assert_eq!(page.articles, rss);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }
}
