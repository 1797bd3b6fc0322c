use std::fmt;

use serde::{Deserialize, Serialize};

/// Image used when an upstream item carries no usable image field.
pub const PLACEHOLDER_IMAGE: &str = "https://source.unsplash.com/400x200/?news";

pub const DUMMY_TITLE: &str = "Dummy News";
pub const DUMMY_URL: &str = "https://example.com";
pub const DUMMY_IMAGE: &str = "https://source.unsplash.com/random";

pub const NO_TITLE: &str = "No title";

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Topical bucket of an article. The seven named buckets are what the
/// classifier and the feed table produce; `Other` carries a category a caller
/// asked for that is outside that set, spelled as requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Sports,
    Technology,
    Health,
    Business,
    Science,
    Entertainment,
    General,
    Other(String),
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sports,
        Category::Technology,
        Category::Health,
        Category::Business,
        Category::Science,
        Category::Entertainment,
        Category::General,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Sports => "sports",
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Business => "business",
            Category::Science => "science",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Other(name) => name.as_str(),
        }
    }

    /// Case-insensitive lookup of the named buckets; anything else becomes
    /// [`Category::Other`].
    pub fn parse(value: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_else(|| Category::Other(value.to_string()))
    }

    /// Category names compare case-insensitively.
    pub fn matches(&self, other: &Category) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Where an article came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    NewsApi,
    Rss,
    /// Synthesized when every upstream came back empty. Never serialized.
    #[default]
    Placeholder,
}

impl Source {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Source::Placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Source::is_placeholder")]
    pub source: Source,
    pub category: Category,
}

impl Article {
    /// The stand-in returned when neither upstream produced anything.
    pub fn placeholder(category: Category) -> Self {
        Self {
            title: DUMMY_TITLE.to_string(),
            url: DUMMY_URL.to_string(),
            image: DUMMY_IMAGE.to_string(),
            source: Source::Placeholder,
            category,
        }
    }
}

/// Parameters of a `get_news` call. Field names match the `/news` query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsRequest {
    pub page: usize,
    pub page_size: usize,
    pub category: String,
    pub query: String,
}

impl Default for NewsRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            category: String::new(),
            query: String::new(),
        }
    }
}

impl NewsRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Half-open `[start, end)` window over the aggregated list. Pages and
    /// sizes below 1 are treated as 1.
    pub fn window(&self) -> (usize, usize) {
        let page = self.page.max(1);
        let page_size = self.page_size.max(1);
        let start = (page - 1).saturating_mul(page_size);
        (start, start.saturating_add(page_size))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub articles: Vec<Article>,
}
