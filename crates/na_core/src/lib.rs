pub mod classifier;
pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use classifier::infer_category;
pub use config::NewsConfig;
pub use error::{Error, Result};
pub use sources::{FallbackSource, PrimarySource};
pub use types::{Article, Category, NewsPage, NewsRequest, Source};

