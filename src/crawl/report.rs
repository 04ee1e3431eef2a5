// src/crawl/report.rs
// =============================================================================
// Crawl statistics.
//
// CrawlStats is a bag of atomic counters every branch bumps without locking.
// When the crawl finishes it is snapshotted into a CrawlReport, which can be
// printed as a summary or as JSON.
// =============================================================================

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Default)]
pub struct CrawlStats {
    pub emitted: AtomicUsize,
    pub leaves: AtomicUsize,
    pub disallowed: AtomicUsize,
    pub duplicates: AtomicUsize,
    pub status_failures: AtomicUsize,
    pub network_failures: AtomicUsize,
    pub links_discovered: AtomicUsize,
    pub out_of_scope: AtomicUsize,
    pub unparseable: AtomicUsize,
}

impl CrawlStats {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self, elapsed: Duration) -> CrawlReport {
        let read = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        CrawlReport {
            pages_emitted: read(&self.emitted),
            non_html_pages: read(&self.leaves),
            disallowed_by_robots: read(&self.disallowed),
            duplicates_skipped: read(&self.duplicates),
            status_failures: read(&self.status_failures),
            network_failures: read(&self.network_failures),
            links_discovered: read(&self.links_discovered),
            out_of_scope_links: read(&self.out_of_scope),
            unparseable_links: read(&self.unparseable),
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

/// Final numbers for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlReport {
    /// URLs sent to the sitemap
    pub pages_emitted: usize,
    /// Emitted URLs that were not scanned for links
    pub non_html_pages: usize,
    pub disallowed_by_robots: usize,
    pub duplicates_skipped: usize,
    /// Non-2xx responses
    pub status_failures: usize,
    pub network_failures: usize,
    /// hrefs found across all scanned pages, duplicates included
    pub links_discovered: usize,
    pub out_of_scope_links: usize,
    pub unparseable_links: usize,
    pub elapsed_secs: f64,
}

impl CrawlReport {
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "\n=== Crawl Statistics ===")?;
        writeln!(out, "Pages in sitemap:          {}", self.pages_emitted)?;
        writeln!(out, "  of which not HTML:       {}", self.non_html_pages)?;
        writeln!(out, "Skipped (robots.txt):      {}", self.disallowed_by_robots)?;
        writeln!(out, "Skipped (duplicate):       {}", self.duplicates_skipped)?;
        writeln!(out, "Failed (HTTP status):      {}", self.status_failures)?;
        writeln!(out, "Failed (network):          {}", self.network_failures)?;
        writeln!(out, "Links discovered:          {}", self.links_discovered)?;
        writeln!(out, "  out of scope:            {}", self.out_of_scope_links)?;
        writeln!(out, "  unparseable:             {}", self.unparseable_links)?;
        writeln!(out, "Total duration:            {:.2}s", self.elapsed_secs)?;
        writeln!(out, "========================")
    }

    pub fn write_json<W: Write>(&self, mut out: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)
    }
}
