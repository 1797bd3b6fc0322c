pub mod aggregator;
pub mod client;
pub mod logging;
pub mod newsapi;
pub mod rss;

pub use aggregator::NewsAggregator;
pub use client::build_client;
pub use logging::{init_logging, Logger};
pub use newsapi::NewsApiSource;
pub use rss::{default_feeds, Feed, RssSource};

pub mod prelude {
    pub use super::{NewsAggregator, NewsApiSource, RssSource};
    pub use na_core::{Article, Category, Error, NewsPage, NewsRequest, Result};
}
