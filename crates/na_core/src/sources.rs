use async_trait::async_trait;

use crate::types::{Article, Category};

/// The preferred upstream. Failures are logged by the implementation and come
/// back as an empty list so the caller can move on to the fallback.
#[async_trait]
pub trait PrimarySource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch articles, optionally narrowed by category and free-text query.
    async fn fetch_primary(&self, category: Option<&Category>, query: &str) -> Vec<Article>;
}

/// Consulted only when the primary source came back empty. Has no search
/// capability, so it takes no arguments.
#[async_trait]
pub trait FallbackSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_fallback(&self) -> Vec<Article>;
}
