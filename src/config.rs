// src/config.rs
// =============================================================================
// Crawl configuration and root URL validation.
//
// All configuration comes from the command line. Everything that can go wrong
// before the first request is sent is a ConfigError and aborts the run.
// =============================================================================

use std::num::NonZeroUsize;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_USER_AGENT: &str = concat!("sitemap-crawler/", env!("CARGO_PKG_VERSION"));

/// Fatal errors raised before any page is fetched
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid website URL '{input}': {source}")]
    InvalidRootUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("website URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("website URL has no host: {0}")]
    MissingHost(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to retrieve robots.txt from {url}: {reason}")]
    RobotsUnavailable { url: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts, fragment removed
    pub root: Url,
    /// Host every in-scope URL must share with the root
    pub root_host: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// None means one in-flight fetch per discovered link
    pub max_concurrency: Option<NonZeroUsize>,
    pub strict_robots: bool,
}

impl CrawlConfig {
    // Validates the root URL and fills every other setting with its default
    pub fn new(website: &str) -> Result<Self, ConfigError> {
        let mut root = Url::parse(website.trim()).map_err(|source| ConfigError::InvalidRootUrl {
            input: website.to_string(),
            source,
        })?;

        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(root.scheme().to_string()));
        }

        let root_host = root
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ConfigError::MissingHost(website.to_string()))?
            .to_string();

        root.set_fragment(None);

        Ok(Self {
            root,
            root_host,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_concurrency: None,
            strict_robots: false,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::new(&cli.website)?
            .with_timeout(Duration::from_secs(cli.timeout.max(1)))
            .with_max_concurrency(cli.max_concurrency.unwrap_or(0));
        config.user_agent = cli.user_agent.clone();
        config.strict_robots = cli.strict_robots;
        Ok(config)
    }

    // 0 means unbounded
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = NonZeroUsize::new(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // The agent name robots.txt groups are matched against:
    // "sitemap-crawler/0.1.0 (+https://...)" -> "sitemap-crawler"
    pub fn robots_agent(&self) -> &str {
        self.user_agent
            .split(['/', ' '])
            .next()
            .filter(|token| !token.is_empty())
            .unwrap_or("*")
    }
}
