// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr only, stdout is reserved for the XML)
// 3. Crawl the site and build the sitemap
// 4. Print the sitemap, optionally followed by crawl statistics on stderr
// 5. Exit with proper code (0 = sitemap printed, 1 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl settings and root URL validation
mod crawl; // src/crawl/ - the concurrent crawl engine
mod fetch; // src/fetch.rs - HTTP requests
mod links; // src/links/ - href extraction and URL scoping
mod policy; // src/policy.rs - robots.txt rules
mod sitemap; // src/sitemap.rs - sitemap.xml rendering

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, ReportFormat};
use config::CrawlConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // clap would exit with code 2 on a usage error; we promise 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(), // --help / --version
    };

    init_tracing(cli.log_directive());

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = CrawlConfig::from_cli(&cli)?;
    tracing::info!(website = %config.root, "crawling");

    let (sitemap, report) = crawl::crawl_site(config).await?;
    if sitemap.is_empty() {
        tracing::warn!("no page could be fetched, printing an empty sitemap");
    } else {
        tracing::info!("writing sitemap with {} urls", sitemap.len());
    }

    sitemap
        .write_to(io::stdout().lock())
        .context("failed to print sitemap")?;

    match cli.report {
        Some(ReportFormat::Text) => report.write_text(io::stderr().lock())?,
        Some(ReportFormat::Json) => report.write_json(io::stderr().lock())?,
        None => {}
    }

    Ok(())
}
