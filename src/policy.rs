// src/policy.rs
// =============================================================================
// robots.txt enforcement for the crawled host.
//
// The rules are fetched once, before the crawl starts, and never change
// afterwards. Every branch reads them concurrently without a lock.
//
// A missing robots.txt (404, 5xx, network failure) means "allow everything".
// With strict mode on, a network failure aborts the run instead.
// =============================================================================

use robotstxt::DefaultMatcher;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ConfigError, CrawlConfig};
use crate::fetch::HttpFetcher;

#[derive(Debug, Clone)]
pub struct PolicyGuard {
    // None = no usable robots.txt, everything is allowed
    rules: Option<String>,
    agent: String,
}

impl PolicyGuard {
    pub fn permissive(agent: impl Into<String>) -> Self {
        Self {
            rules: None,
            agent: agent.into(),
        }
    }

    pub fn from_rules(rules: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            rules: Some(rules.into()),
            agent: agent.into(),
        }
    }

    // Fetches <scheme>://<host>[:port]/robots.txt for the crawl root
    pub async fn fetch(fetcher: &HttpFetcher, config: &CrawlConfig) -> Result<Self, ConfigError> {
        let agent = config.robots_agent().to_string();
        let robots_url = robots_url(&config.root);

        info!(url = %robots_url, "fetching robots.txt");

        let page = match fetcher.get(&robots_url).await {
            Ok(page) => page,
            Err(e) if config.strict_robots => {
                return Err(ConfigError::RobotsUnavailable {
                    url: robots_url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(url = %robots_url, error = %e, "robots.txt unreachable, allowing all paths");
                return Ok(Self::permissive(agent));
            }
        };

        if !page.status().is_success() {
            debug!(url = %robots_url, status = %page.status(), "no robots.txt, allowing all paths");
            return Ok(Self::permissive(agent));
        }

        match page.text().await {
            Ok(text) => {
                debug!(bytes = text.len(), "robots.txt loaded");
                Ok(Self::from_rules(text, agent))
            }
            Err(e) if config.strict_robots => Err(ConfigError::RobotsUnavailable {
                url: robots_url.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => {
                warn!(error = %e, "could not read robots.txt body, allowing all paths");
                Ok(Self::permissive(agent))
            }
        }
    }

    pub fn has_rules(&self) -> bool {
        self.rules.is_some()
    }

    // Whether our agent may fetch this URL
    //
    // robotstxt has no pre-parsed rule set: every call re-parses the whole
    // stored body, so a check costs O(robots.txt size). Each call also needs
    // its own matcher because the matcher keeps per-call match state.
    pub fn allowed(&self, url: &Url) -> bool {
        match &self.rules {
            None => true,
            Some(rules) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(rules, &self.agent, url.as_str())
            }
        }
    }
}

fn robots_url(root: &Url) -> Url {
    let mut url = root.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url
}
