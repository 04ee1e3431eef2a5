// src/links/scope.rs
// =============================================================================
// URL normalization and the same-host scope check.
//
// resolve() turns whatever was inside href="..." into an absolute URL using
// the page it was found on as the base. in_scope() decides whether such a URL
// belongs to the site being crawled.
// =============================================================================

use url::{ParseError, Url};

// Resolves a possibly-relative href to an absolute URL
//
// Parameters:
//   base: the URL of the page the href was found on
//   href: the raw attribute value
//
// Returns: the absolute URL without its fragment, or the ParseError when the
// href cannot be resolved (caller drops the link)
//
// Examples:
//   base = "https://ex.test/docs/page"
//   href = "/a"         -> "https://ex.test/a"
//   href = "../up"      -> "https://ex.test/up"
//   href = "?page=2"    -> "https://ex.test/docs/page?page=2"
//   href = "#section"   -> "https://ex.test/docs/page"
pub fn resolve(base: &Url, href: &str) -> Result<Url, ParseError> {
    let mut url = base.join(href)?;
    // Fragments never reach the server, /a#x and /a are the same page
    url.set_fragment(None);
    Ok(url)
}

// Checks whether a URL belongs to the crawled site
//
// True iff the URL is http(s) and its host equals root_host. Scheme and port
// are ignored, so http://ex.test:8080/ is in scope for a crawl of
// https://ex.test/.
pub fn in_scope(candidate: &Url, root_host: &str) -> bool {
    matches!(candidate.scheme(), "http" | "https")
        && candidate
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(root_host))
}
