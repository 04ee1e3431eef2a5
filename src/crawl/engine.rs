// src/crawl/engine.rs
// =============================================================================
// The concurrent crawl engine.
//
// How it works:
// 1. The root URL is the first CrawlTarget
// 2. Each target runs in its own tokio task (a "branch"):
//    robots check -> claim in VisitedSet -> fetch -> emit -> scan for links
// 3. Every in-scope link found on an HTML page becomes a new branch
// 4. When the last branch finishes, run() returns and the result channel
//    closes, which tells the sitemap side to stop reading
//
// Branch failures (network errors, 404s, robots exclusions) only end that
// branch. They are logged and counted, never propagated.
//
// Rust concepts:
// - Arc: Shared ownership of the crawl state across tasks
// - BoxFuture: Lets a task spawn more tasks of its own kind
// - mpsc channels: Many senders (branches), one receiver (the sitemap)
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, trace, warn};
use url::Url;

use super::group::{WorkGroup, WorkToken};
use super::report::{CrawlReport, CrawlStats};
use super::visited::VisitedSet;
use crate::config::CrawlConfig;
use crate::fetch::{FetchError, HttpFetcher};
use crate::links;
use crate::policy::PolicyGuard;

// One URL waiting to go through a branch
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: Url,
    /// Page the link was found on, None for the root
    pub referrer: Option<Url>,
}

impl CrawlTarget {
    fn root(url: Url) -> Self {
        Self { url, referrer: None }
    }

    fn linked_from(url: Url, page: &Url) -> Self {
        Self {
            url,
            referrer: Some(page.clone()),
        }
    }
}

// Why a branch stopped early. Logged by the branch, never returned further.
#[derive(Debug, Error)]
pub enum BranchError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("skipping {url}: HTTP {status}")]
    Status { url: String, status: StatusCode },
}

// How a branch ended when nothing went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// robots.txt said no
    Disallowed,
    /// another branch already claimed this URL
    Duplicate,
    /// Emitted, but not HTML so nothing was scanned
    Leaf,
    /// Emitted and scanned; this many child branches were spawned
    Crawled { spawned: usize },
}

// State shared by every branch of one crawl run
struct CrawlContext {
    root_host: String,
    fetcher: HttpFetcher,
    policy: PolicyGuard,
    visited: VisitedSet,
    group: WorkGroup,
    stats: CrawlStats,
    permits: Option<Semaphore>,
    results: mpsc::UnboundedSender<String>,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: HttpFetcher,
    policy: PolicyGuard,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: HttpFetcher, policy: PolicyGuard) -> Self {
        Self {
            config,
            fetcher,
            policy,
        }
    }

    // Crawls the whole site, sending every successfully fetched URL to
    // `results`.
    //
    // Returns after the last branch has finished. The sender is dropped with
    // the crawl context, so the receiver sees the channel close right after.
    pub async fn run(self, results: mpsc::UnboundedSender<String>) -> CrawlReport {
        let started = Instant::now();
        let root = self.config.root.clone();

        info!(
            root = %root,
            max_concurrency = ?self.config.max_concurrency,
            robots_rules = self.policy.has_rules(),
            "starting crawl"
        );

        let ctx = Arc::new(CrawlContext {
            root_host: self.config.root_host,
            fetcher: self.fetcher,
            policy: self.policy,
            visited: VisitedSet::new(),
            group: WorkGroup::new(),
            stats: CrawlStats::default(),
            permits: self.config.max_concurrency.map(|n| Semaphore::new(n.get())),
            results,
        });

        ctx.spawn(CrawlTarget::root(root));
        ctx.group.wait().await;

        let report = ctx.stats.snapshot(started.elapsed());
        info!(
            pages = report.pages_emitted,
            visited = ctx.visited.len(),
            elapsed_secs = report.elapsed_secs,
            "crawl complete"
        );
        report
    }
}

impl CrawlContext {
    // Registers the branch with the work group, then spawns it
    fn spawn(self: &Arc<Self>, target: CrawlTarget) {
        let token = self.group.add();
        tokio::spawn(branch(Arc::clone(self), target, token));
    }

    async fn process(self: &Arc<Self>, target: &CrawlTarget) -> Result<BranchOutcome, BranchError> {
        let url = target.url.clone();

        if !self.policy.allowed(&url) {
            debug!(url = %url, "disallowed by robots.txt");
            return Ok(BranchOutcome::Disallowed);
        }

        if !self.visited.insert(url.as_str()) {
            trace!(url = %url, "already visited");
            return Ok(BranchOutcome::Duplicate);
        }

        // Held until the body has been read; released before children spawn
        let permit = match &self.permits {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };

        debug!(url = %url, "fetching");
        let page = self.fetcher.get(&url).await?;

        if !page.status().is_success() {
            return Err(BranchError::Status {
                url: url.to_string(),
                status: page.status(),
            });
        }

        // Emit before looking at the body: a page we cannot parse is still
        // part of the site
        if self.results.send(url.to_string()).is_err() {
            warn!(url = %url, "sitemap receiver closed, dropping result");
        }
        CrawlStats::bump(&self.stats.emitted);

        if !page.is_html() {
            debug!(url = %url, content_type = ?page.content_type(), "not HTML, not scanning");
            return Ok(BranchOutcome::Leaf);
        }

        // Relative links resolve against where the page actually came from,
        // which differs from `url` after a redirect
        let base = page.final_url().clone();
        let body = page.text().await?;
        drop(permit);

        let hrefs = links::extract_links(&body);
        CrawlStats::add(&self.stats.links_discovered, hrefs.len());

        let mut spawned = 0;
        for href in hrefs {
            let link = match links::resolve(&base, &href) {
                Ok(link) => link,
                Err(e) => {
                    debug!(page = %url, href = %href, error = %e, "dropping unparseable link");
                    CrawlStats::bump(&self.stats.unparseable);
                    continue;
                }
            };

            if !links::in_scope(&link, &self.root_host) {
                trace!(page = %url, link = %link, "out of scope");
                CrawlStats::bump(&self.stats.out_of_scope);
                continue;
            }

            // Links we already claimed would only end as Duplicate
            if self.visited.contains(link.as_str()) {
                CrawlStats::bump(&self.stats.duplicates);
                continue;
            }

            self.spawn(CrawlTarget::linked_from(link, &url));
            spawned += 1;
        }

        Ok(BranchOutcome::Crawled { spawned })
    }

    fn record(&self, target: &CrawlTarget, result: Result<BranchOutcome, BranchError>) {
        let url = &target.url;
        let referrer = target.referrer.as_ref().map(Url::as_str).unwrap_or("-");
        match result {
            Ok(BranchOutcome::Disallowed) => CrawlStats::bump(&self.stats.disallowed),
            Ok(BranchOutcome::Duplicate) => CrawlStats::bump(&self.stats.duplicates),
            Ok(BranchOutcome::Leaf) => CrawlStats::bump(&self.stats.leaves),
            Ok(BranchOutcome::Crawled { spawned }) => {
                trace!(url = %url, spawned, "page crawled");
            }
            Err(e @ BranchError::Status { .. }) => {
                warn!(linked_from = %referrer, "{e}");
                CrawlStats::bump(&self.stats.status_failures);
            }
            Err(BranchError::Network(e)) => {
                warn!(url = %url, linked_from = %referrer, "fetch failed: {e}");
                CrawlStats::bump(&self.stats.network_failures);
            }
        }
    }
}

// One branch of the crawl tree. Boxed because it spawns copies of itself.
fn branch(ctx: Arc<CrawlContext>, target: CrawlTarget, token: WorkToken) -> BoxFuture<'static, ()> {
    async move {
        let result = ctx.process(&target).await;
        ctx.record(&target, result);
        // The token goes last so the group cannot see zero while this branch
        // is still recording
        drop(token);
    }
    .boxed()
}
