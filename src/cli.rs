// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: crawl the site given by --website and print
// its sitemap.xml to stdout. Everything else is tuning for the crawl.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{ArgAction, Parser, ValueEnum};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "sitemap-crawler",
    version,
    about = "Crawl a website and print its sitemap.xml",
    long_about = "sitemap-crawler starts from a root URL, follows every same-host link it is \
                  allowed to by robots.txt, and prints a sitemap of every page that answered \
                  with a success status."
)]
pub struct Cli {
    /// Website URL to crawl (e.g., https://example.com)
    ///
    /// Only pages on this host are fetched. Links to other hosts are
    /// discovered but never followed.
    #[arg(long, value_name = "URL")]
    pub website: String,

    /// User-Agent header sent with every request
    ///
    /// The part before the first '/' is also the agent name matched
    /// against robots.txt groups.
    #[arg(long, default_value = crate::config::DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum number of requests in flight at once (default: unbounded)
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Abort when robots.txt cannot be retrieved because of a network error
    ///
    /// Without this flag an unreachable robots.txt is treated as "allow all".
    #[arg(long)]
    pub strict_robots: bool,

    /// Print crawl statistics to stderr after the sitemap
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub report: Option<ReportFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How the crawl statistics are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable summary
    Text,
    /// Pretty-printed JSON object
    Json,
}

impl Cli {
    // Maps -v repetitions to a tracing filter directive
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
