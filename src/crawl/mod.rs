// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - One tokio task per discovered in-scope link (optionally capped)
// - robots.txt enforcement through the PolicyGuard
// - Exactly-once visiting through a concurrent VisitedSet
// - Completion tracked by a WorkGroup so the result stream closes only after
//   the last page is done
//
// crawl_site() is the entry point: it runs the engine in its own task and
// builds the sitemap from the engine's result channel as results arrive.
// =============================================================================

mod engine;
mod group;
mod report;
mod visited;

use engine::Crawler;
pub use report::CrawlReport;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::config::CrawlConfig;
use crate::fetch::HttpFetcher;
use crate::policy::PolicyGuard;
use crate::sitemap::Sitemap;

// Crawls the website described by `config`
//
// Returns: the sitemap of every page that answered 2xx, plus crawl statistics
//
// Only setup can fail (HTTP client, strict robots.txt). Failures on
// individual pages are logged and left out of the sitemap.
pub async fn crawl_site(config: CrawlConfig) -> Result<(Sitemap, CrawlReport)> {
    let fetcher = HttpFetcher::new(&config)?;
    let policy = PolicyGuard::fetch(&fetcher, &config).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    let engine = tokio::spawn(Crawler::new(config, fetcher, policy).run(tx));

    let sitemap = Sitemap::collect(rx).await;
    let report = engine.await.context("crawl engine task failed")?;

    Ok((sitemap, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_crawl_site_fetches_robots_once() {
        let server = MockServer::start_async().await;
        let robots = server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(200).body("User-agent: *\nDisallow: /private/\n");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200)
                    .header("content-type", "text/html")
                    .body(r#"<a href="/private/secret">s</a><a href="/about">about</a>"#);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/about");
                then.status(200).header("content-type", "text/html").body("about");
            })
            .await;

        let config = CrawlConfig::new(&server.url("/")).unwrap();
        let (sitemap, report) = crawl_site(config).await.unwrap();

        let mut locations: Vec<_> = sitemap.locations().map(str::to_string).collect();
        locations.sort();
        assert_eq!(locations, vec![server.url("/"), server.url("/about")]);
        assert_eq!(report.disallowed_by_robots, 1);
        robots.assert_hits_async(1).await;
    }
}
