// src/crawl/visited.rs
// =============================================================================
// The set of URLs a crawl run has already claimed.
//
// The only mutable state shared between branches. "Is it in the set?" and
// "put it in the set" are one operation here: insert() returns whether this
// caller was the one that added the URL, so two branches racing on the same
// link cannot both go on to fetch it.
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller.
    ///
    /// Returns `true` exactly once per distinct URL over the life of the set;
    /// every later call with the same URL returns `false`.
    pub fn insert(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}
