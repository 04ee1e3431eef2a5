// src/links/mod.rs
// =============================================================================
// Link discovery: pulling href values out of a page and turning them into
// absolute, in-scope URLs.
//
// Submodules:
// - extract: finds href="..." attribute values in raw HTML
// - scope: resolves hrefs against the page URL and checks the host
// =============================================================================

mod extract;
mod scope;

pub use extract::extract_links;
pub use scope::{in_scope, resolve};
