use std::fmt;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_UPSTREAM_PAGE_SIZE: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings shared by the upstream adapters.
#[derive(Clone)]
pub struct NewsConfig {
    /// NewsAPI secret. Without it the primary source is skipped.
    pub newsapi_key: Option<String>,
    pub newsapi_url: String,
    pub country: String,
    pub upstream_page_size: u32,
    /// Applied to every outbound request.
    pub request_timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            newsapi_url: DEFAULT_NEWSAPI_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            upstream_page_size: DEFAULT_UPSTREAM_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsConfig")
            .field("newsapi_key", &self.newsapi_key.as_ref().map(|_| "<redacted>"))
            .field("newsapi_url", &self.newsapi_url)
            .field("country", &self.country)
            .field("upstream_page_size", &self.upstream_page_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl NewsConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.newsapi_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_newsapi_url(mut self, url: impl Into<String>) -> Self {
        self.newsapi_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.newsapi_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.newsapi_url, e)))?;
        if self.country.trim().is_empty() {
            return Err(Error::Config("country must not be empty".to_string()));
        }
        if self.upstream_page_size == 0 {
            return Err(Error::Config("upstream page size must be at least 1".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}
