use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use na_core::config::{DEFAULT_COUNTRY, DEFAULT_NEWSAPI_URL};
use na_core::types::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use na_core::{NewsConfig, NewsRequest};
use na_sources::{default_feeds, init_logging, NewsAggregator};
use na_web::{AppState, WebConfig, DEFAULT_ADDR};
use tracing::{info, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = Duration::ZERO;
        let mut current_number = String::new();
        let mut chars = s.trim().chars().peekable();
        let mut has_number = false;

        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Invalid character in duration: {}", c))?;
            current_number.clear();
            has_number = true;
            let step = match c {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    Some(Duration::from_millis(num))
                }
                's' => Some(Duration::from_secs(num)),
                'm' => num.checked_mul(60).map(Duration::from_secs),
                'h' => num.checked_mul(3600).map(Duration::from_secs),
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total = step
                .and_then(|step| total.checked_add(step))
                .ok_or_else(|| "Duration is too large".to_string())?;
        }

        // A bare number means seconds
        if !current_number.is_empty() {
            let num: u64 = current_number
                .parse()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total = total
                .checked_add(Duration::from_secs(num))
                .ok_or_else(|| "Duration is too large".to_string())?;
            has_number = true;
        }

        if !has_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(total))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headlines from NewsAPI with an RSS fallback", long_about = None)]
struct Cli {
    /// NewsAPI key. Without one only the RSS feeds are used.
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    newsapi_key: Option<String>,
    #[arg(long, env = "NEWSAPI_URL", default_value = DEFAULT_NEWSAPI_URL)]
    newsapi_url: String,
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,
    /// Per-request timeout for upstream calls (e.g. 5s, 1m, 750ms)
    #[arg(long, default_value = "5s")]
    timeout: HumanDuration,
    #[arg(long, default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve `GET /news` over HTTP
    Serve {
        #[arg(long, env = "NEWSAGG_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
        /// Allowed CORS origin; repeat or comma-separate for several. Any origin when unset.
        #[arg(long = "allowed-origin", env = "NEWSAGG_ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },
    /// Run the pipeline once and print the page as JSON
    Fetch {
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        query: String,
    },
    /// List the fallback RSS feeds in the order they are read
    Feeds,
}

impl Cli {
    fn news_config(&self) -> NewsConfig {
        let mut config = NewsConfig::default()
            .with_newsapi_url(self.newsapi_url.clone())
            .with_timeout(self.timeout.0);
        if let Some(key) = &self.newsapi_key {
            config = config.with_api_key(key.clone());
        }
        config.country = self.country.clone();
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = cli.news_config();

    match cli.command {
        Commands::Serve {
            addr,
            allowed_origins,
        } => {
            let aggregator =
                NewsAggregator::from_config(&config).context("invalid news configuration")?;
            if config.newsapi_key.is_none() {
                info!("🔑 No NewsAPI key configured, serving RSS feeds only");
            }
            let web_config = WebConfig { allowed_origins };
            let app = na_web::create_app(AppState::new(aggregator), &web_config)
                .await
                .context("failed to build router")?;
            na_web::serve(addr, app)
                .await
                .with_context(|| format!("server on {} failed", addr))?;
        }
        Commands::Fetch {
            page,
            page_size,
            category,
            query,
        } => {
            let aggregator =
                NewsAggregator::from_config(&config).context("invalid news configuration")?;
            let request = NewsRequest::new(page, page_size)
                .with_category(category)
                .with_query(query);
            let page = aggregator.get_news(&request).await;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Commands::Feeds => {
            for (i, feed) in default_feeds().iter().enumerate() {
                println!("{:>2}. {:<13} {}", i + 1, feed.category, feed.url);
            }
        }
    }

    Ok(())
}
